//! Aggregate views

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::stats::{Beneficiary, ImpactStatistics},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The single row of `impact_statistics`
    pub async fn impact(&self) -> AppResult<ImpactStatistics> {
        let row = sqlx::query_as::<_, ImpactStatistics>("SELECT * FROM impact_statistics")
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Beneficiaries, most recent distribution first
    pub async fn beneficiaries(&self) -> AppResult<Vec<Beneficiary>> {
        let rows = sqlx::query_as::<_, Beneficiary>(
            "SELECT * FROM view_beneficiaries ORDER BY date_received DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Distinct donors by email, across all donations
    pub async fn count_donors(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT LOWER(email)) FROM donations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
