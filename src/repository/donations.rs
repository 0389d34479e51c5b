//! Donations repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        donation::{CreateDonation, Donation, DonationQuery, DonationStats},
        enums::DonationStatus,
        PageWindow,
    },
};

#[derive(Clone)]
pub struct DonationsRepository {
    pool: Pool<Postgres>,
}

impl DonationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get donation by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Donation> {
        sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Donation {} not found", id)))
    }

    /// Insert a new pending donation
    pub async fn create(&self, data: &CreateDonation, user_id: Option<Uuid>) -> AppResult<Donation> {
        let row = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                user_id, donor_name, organization, email, phone, address,
                computer_type, quantity, condition_status, pickup_date, message, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.donor_name.trim())
        .bind(&data.organization)
        .bind(data.email.trim())
        .bind(data.phone.trim())
        .bind(data.address.trim())
        .bind(data.computer_type)
        .bind(data.quantity)
        .bind(data.condition_status)
        .bind(data.pickup_date)
        .bind(&data.message)
        .bind(DonationStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// List donations, newest first, with optional status filter
    pub async fn list(&self, query: &DonationQuery, window: PageWindow) -> AppResult<(Vec<Donation>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM donations WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Donation>(
            r#"
            SELECT * FROM donations
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.status)
        .bind(window.limit)
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Donations owned by a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Set status, and the pickup date when one is given
    pub async fn update_status(
        &self,
        id: i64,
        status: DonationStatus,
        pickup_date: Option<NaiveDate>,
    ) -> AppResult<Donation> {
        sqlx::query_as::<_, Donation>(
            r#"
            UPDATE donations
            SET status = $2, pickup_date = COALESCE($3, pickup_date), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(pickup_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Donation {} not found", id)))
    }

    /// Donation counters
    pub async fn stats(&self) -> AppResult<DonationStats> {
        let stats = sqlx::query_as::<_, DonationStats>(
            r#"
            SELECT
                COUNT(*)::bigint AS total_donations,
                COALESCE(SUM(quantity), 0)::bigint AS total_computers,
                COUNT(*) FILTER (WHERE status = 'delivered')::bigint AS delivered_donations,
                COUNT(*) FILTER (WHERE status = 'pending')::bigint AS pending_donations
            FROM donations
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Count donations in a status
    pub async fn count_by_status(&self, status: DonationStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Donations that left pending/rejected and were last updated within the period
    pub async fn approved_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, Donation>(
            r#"
            SELECT * FROM donations
            WHERE status IN ('approved', 'collected', 'processing', 'delivered')
              AND ($1::date IS NULL OR updated_at >= $1::date)
              AND ($2::date IS NULL OR updated_at < $2::date + INTERVAL '1 day')
            ORDER BY updated_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
