//! Dashboard, impact and period report types

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::{donation::Donation, school_request::SchoolRequest};

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingCounts {
    pub donations: i64,
    pub requests: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatistics {
    pub pending: PendingCounts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub statistics: DashboardStatistics,
}

/// Row of the `impact_statistics` view
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ImpactStatistics {
    pub total_computers_donated: i64,
    pub total_computers_delivered: i64,
    pub computers_in_stock: i64,
    pub schools_supported: i64,
    pub students_reached: i64,
    pub total_donors: i64,
}

/// Row of the `view_beneficiaries` view
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Beneficiary {
    pub request_id: i64,
    pub school_name: String,
    pub location: String,
    pub computer_type: String,
    pub quantity: i64,
    pub reason_for_request: String,
    pub date_received: DateTime<Utc>,
}

/// Period filter for reports
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Delivered unit with the location and time it was given out
#[derive(Debug, Clone, FromRow)]
pub struct DistributionRow {
    pub location: String,
    pub delivered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportSummary {
    pub total_donors: i64,
    pub total_schools: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportApprovals {
    pub donations: Vec<Donation>,
    pub requests: Vec<SchoolRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub summary: ReportSummary,
    pub approvals: ReportApprovals,
    /// location -> "YYYY-MM" -> units delivered
    pub distribution_by_location_month: BTreeMap<String, BTreeMap<String, i64>>,
}
