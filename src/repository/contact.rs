//! Contact messages repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        contact::{ContactMessage, ContactQuery, CreateContactMessage},
        enums::ContactStatus,
        PageWindow,
    },
};

#[derive(Clone)]
pub struct ContactRepository {
    pool: Pool<Postgres>,
}

impl ContactRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateContactMessage) -> AppResult<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(data.subject.trim())
        .bind(&data.message)
        .bind(ContactStatus::Unread)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self, query: &ContactQuery, window: PageWindow) -> AppResult<(Vec<ContactMessage>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT * FROM contact_messages
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

    pub async fn update_status(&self, id: i64, status: ContactStatus) -> AppResult<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Message {} not found", id)))
    }
}
