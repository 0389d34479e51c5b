//! School directory model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{SchoolLevel, SchoolStatus};

/// School directory entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub school_type: SchoolLevel,
    pub student_count: Option<i32>,
    /// Running total of delivered units, used for impact reporting
    pub computers_received: i32,
    pub status: SchoolStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SchoolQuery {
    pub location: Option<String>,
    pub status: Option<SchoolStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolPage {
    pub schools: Vec<School>,
    pub pagination: super::Pagination,
}
