//! User profiles repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{AuthUser, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Profile for a provider user id, if it has been mirrored locally
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Mirror the caller's profile from token claims when it is not stored yet.
    /// Returns whether a profile row exists for the caller afterwards.
    pub async fn ensure_profile(&self, user: &AuthUser) -> AppResult<bool> {
        if let Some(email) = user.email.as_deref() {
            let name = user
                .name
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| email.split('@').next().unwrap_or(email));

            sqlx::query(
                r#"
                INSERT INTO users (id, name, email, user_type)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user.id)
            .bind(name)
            .bind(email)
            .bind(user.role)
            .execute(&self.pool)
            .await?;
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
