//! School request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{RequestComputerType, RequestStatus};

/// A school's ask for equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolRequest {
    pub id: i64,
    pub user_id: Uuid,
    /// Directory entry of the school, when known
    pub school_id: Option<i64>,
    pub school_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub computer_type: RequestComputerType,
    pub quantity: i32,
    pub justification: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request joined with the owning user, for notifications
#[derive(Debug, Clone, FromRow)]
pub struct SchoolRequestWithOwner {
    #[sqlx(flatten)]
    pub request: SchoolRequest,
    pub owner_email: Option<String>,
    pub owner_name: Option<String>,
}

impl SchoolRequestWithOwner {
    /// Address to notify: the owner's account email, else the contact email on the request
    pub fn notification_address(&self) -> Option<&str> {
        self.owner_email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .or(Some(self.request.email.as_str()))
            .filter(|email| !email.trim().is_empty())
    }

    /// Greeting name for notifications
    pub fn greeting_name(&self) -> &str {
        self.owner_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Partner School")
    }
}

/// Submission by a school account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolRequest {
    #[validate(length(min = 1, message = "School name is required"))]
    pub school_name: String,
    pub school_id: Option<i64>,
    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_person: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub computer_type: RequestComputerType,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Why the school needs the equipment (`reason_for_request` is accepted too)
    #[serde(alias = "reason_for_request")]
    #[validate(length(min = 1, message = "Justification is required"))]
    pub justification: String,
}

/// Admin status change
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    /// One of pending, approved, rejected (fulfilled is set by fulfillment)
    pub status: String,
    /// Optional note appended to the notification email
    pub admin_comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SchoolRequestQuery {
    pub status: Option<RequestStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct SchoolRequestStats {
    pub total_requests: i64,
    pub total_computers_requested: i64,
    pub approved_requests: i64,
    pub pending_requests: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolRequestPage {
    pub requests: Vec<SchoolRequest>,
    pub pagination: super::Pagination,
}
