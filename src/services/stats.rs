//! Dashboard counters, impact figures and period reports

use std::collections::BTreeMap;

use crate::{
    error::AppResult,
    models::{
        enums::{DonationStatus, RequestStatus},
        stats::{
            Beneficiary, DashboardResponse, DashboardStatistics, DistributionRow, ImpactStatistics,
            PendingCounts, ReportApprovals, ReportQuery, ReportResponse, ReportSummary,
        },
    },
    repository::Repository,
};

/// Delivered units per location, then per `YYYY-MM` month
pub fn group_by_location_month(rows: &[DistributionRow]) -> BTreeMap<String, BTreeMap<String, i64>> {
    let mut grouped: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for row in rows {
        let location = match row.location.trim() {
            "" => "Unknown",
            location => location,
        };
        let month = row.delivered_at.format("%Y-%m").to_string();
        *grouped
            .entry(location.to_string())
            .or_default()
            .entry(month)
            .or_insert(0) += 1;
    }
    grouped
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Work waiting for an admin
    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let donations = self
            .repository
            .donations
            .count_by_status(DonationStatus::Pending)
            .await?;
        let requests = self
            .repository
            .school_requests
            .count_by_status(RequestStatus::Pending)
            .await?;

        Ok(DashboardResponse {
            statistics: DashboardStatistics {
                pending: PendingCounts { donations, requests },
            },
        })
    }

    pub async fn impact(&self) -> AppResult<ImpactStatistics> {
        self.repository.stats.impact().await
    }

    pub async fn beneficiaries(&self) -> AppResult<Vec<Beneficiary>> {
        self.repository.stats.beneficiaries().await
    }

    /// Activity within an optional date range (both ends inclusive)
    pub async fn report(&self, query: &ReportQuery) -> AppResult<ReportResponse> {
        let total_donors = self.repository.stats.count_donors().await?;
        let total_schools = self.repository.schools.count().await?;

        let donations = self
            .repository
            .donations
            .approved_between(query.start_date, query.end_date)
            .await?;
        let requests = self
            .repository
            .school_requests
            .approved_between(query.start_date, query.end_date)
            .await?;

        let delivered = self
            .repository
            .inventory
            .delivered_between(query.start_date, query.end_date)
            .await?;
        tracing::debug!(units = delivered.len(), "Building distribution report");

        Ok(ReportResponse {
            summary: ReportSummary {
                total_donors,
                total_schools,
            },
            approvals: ReportApprovals { donations, requests },
            distribution_by_location_month: group_by_location_month(&delivered),
        })
    }
}
