//! User profile and identity-provider token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::UserRole;
use crate::error::AppError;

/// Profile row mirrored from the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: UserRole,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-form metadata the identity provider attaches to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// JWT claims as issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(alias = "id")]
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Sign the claims (used by tooling and tests; production tokens come from the provider)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, then decode
    pub fn from_token(
        token: &str,
        secret: &str,
        audience: Option<&str>,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let mut validation = Validation::default();
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }

    /// Role from `user_metadata.user_type`, then `user_type`, defaulting to donor
    pub fn role(&self) -> UserRole {
        self.user_metadata
            .as_ref()
            .and_then(|meta| meta.user_type.as_deref())
            .and_then(|role| role.parse().ok())
            .or_else(|| self.user_type.as_deref().and_then(|role| role.parse().ok()))
            .unwrap_or(UserRole::Donor)
    }
}

/// Identity resolved for an authenticated call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    /// Display name from the provider metadata
    pub name: Option<String>,
    pub role: UserRole,
}

impl From<TokenClaims> for AuthUser {
    fn from(claims: TokenClaims) -> Self {
        let role = claims.role();
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.user_metadata.and_then(|meta| meta.name),
            role,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    pub fn require_role(&self, role: UserRole) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Only {} accounts may do this", role)))
        }
    }

    /// Allow admins, or the user owning the record
    pub fn require_owner_or_admin(&self, owner: Option<Uuid>) -> Result<(), AppError> {
        if self.is_admin() || owner == Some(self.id) {
            Ok(())
        } else {
            Err(AppError::Authorization("Access denied".to_string()))
        }
    }
}
