//! Donation model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{DonationComputerType, DonationCondition, DonationStatus};

/// Pledge of equipment from a donor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Donation {
    pub id: i64,
    /// Owning user, when submitted while signed in
    pub user_id: Option<Uuid>,
    pub donor_name: String,
    pub organization: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub computer_type: DonationComputerType,
    /// Number of units, always >= 1
    pub quantity: i32,
    pub condition_status: DonationCondition,
    /// Pickup date proposed by the donor or confirmed by an admin
    pub pickup_date: Option<NaiveDate>,
    pub message: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public donation submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDonation {
    #[validate(length(min = 1, message = "Donor name is required"))]
    pub donor_name: String,
    pub organization: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub computer_type: DonationComputerType,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: i32,
    pub condition_status: DonationCondition,
    pub pickup_date: Option<NaiveDate>,
    pub message: Option<String>,
}

/// Admin status change
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDonationStatus {
    /// One of pending, approved, collected, processing, delivered, rejected
    pub status: String,
    /// Confirmed collection date, stored as the pickup date
    pub collection_date: Option<NaiveDate>,
}

/// Donation list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct DonationQuery {
    pub status: Option<DonationStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Aggregate counters over all donations
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct DonationStats {
    pub total_donations: i64,
    pub total_computers: i64,
    pub delivered_donations: i64,
    pub pending_donations: i64,
}

/// One page of donations
#[derive(Debug, Serialize, ToSchema)]
pub struct DonationPage {
    pub donations: Vec<Donation>,
    pub pagination: super::Pagination,
}
