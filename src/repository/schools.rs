//! School directory repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        school::{School, SchoolQuery},
        PageWindow,
    },
};

#[derive(Clone)]
pub struct SchoolsRepository {
    pool: Pool<Postgres>,
}

impl SchoolsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<School> {
        sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("School {} not found", id)))
    }

    pub async fn list(&self, query: &SchoolQuery, window: PageWindow) -> AppResult<(Vec<School>, i64)> {
        let location = query.location.as_deref().map(str::trim).filter(|l| !l.is_empty());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM schools
            WHERE ($1::text IS NULL OR LOWER(location) = LOWER($1))
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(location)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, School>(
            r#"
            SELECT * FROM schools
            WHERE ($1::text IS NULL OR LOWER(location) = LOWER($1))
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(location)
        .bind(query.status)
        .bind(window.limit)
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
