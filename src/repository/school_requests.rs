//! School requests repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RequestStatus,
        school_request::{
            CreateSchoolRequest, SchoolRequest, SchoolRequestQuery, SchoolRequestStats,
            SchoolRequestWithOwner,
        },
        PageWindow,
    },
};

#[derive(Clone)]
pub struct SchoolRequestsRepository {
    pool: Pool<Postgres>,
}

impl SchoolRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<SchoolRequest> {
        sqlx::query_as::<_, SchoolRequest>("SELECT * FROM school_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("School request {} not found", id)))
    }

    /// Request joined with the owning user's email and name
    pub async fn get_with_owner(&self, id: i64) -> AppResult<SchoolRequestWithOwner> {
        sqlx::query_as::<_, SchoolRequestWithOwner>(
            r#"
            SELECT r.*, u.email AS owner_email, u.name AS owner_name
            FROM school_requests r
            LEFT JOIN users u ON u.id = r.user_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("School request {} not found", id)))
    }

    pub async fn create(&self, data: &CreateSchoolRequest, user_id: Uuid) -> AppResult<SchoolRequest> {
        let row = sqlx::query_as::<_, SchoolRequest>(
            r#"
            INSERT INTO school_requests (
                user_id, school_id, school_name, contact_person, email, phone,
                location, computer_type, quantity, justification, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.school_id)
        .bind(data.school_name.trim())
        .bind(data.contact_person.trim())
        .bind(data.email.trim())
        .bind(data.phone.trim())
        .bind(data.location.trim())
        .bind(data.computer_type)
        .bind(data.quantity)
        .bind(data.justification.trim())
        .bind(RequestStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        query: &SchoolRequestQuery,
        window: PageWindow,
    ) -> AppResult<(Vec<SchoolRequest>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM school_requests WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SchoolRequest>(
            r#"
            SELECT * FROM school_requests
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

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<SchoolRequest>> {
        let rows = sqlx::query_as::<_, SchoolRequest>(
            "SELECT * FROM school_requests WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_status(&self, id: i64, status: RequestStatus) -> AppResult<SchoolRequest> {
        sqlx::query_as::<_, SchoolRequest>(
            r#"
            UPDATE school_requests SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("School request {} not found", id)))
    }

    pub async fn stats(&self) -> AppResult<SchoolRequestStats> {
        let stats = sqlx::query_as::<_, SchoolRequestStats>(
            r#"
            SELECT
                COUNT(*)::bigint AS total_requests,
                COALESCE(SUM(quantity), 0)::bigint AS total_computers_requested,
                COUNT(*) FILTER (WHERE status = 'approved')::bigint AS approved_requests,
                COUNT(*) FILTER (WHERE status = 'pending')::bigint AS pending_requests
            FROM school_requests
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn count_by_status(&self, status: RequestStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM school_requests WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Approved or fulfilled requests last updated within the period
    pub async fn approved_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<SchoolRequest>> {
        let rows = sqlx::query_as::<_, SchoolRequest>(
            r#"
            SELECT * FROM school_requests
            WHERE status IN ('approved', 'fulfilled')
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
