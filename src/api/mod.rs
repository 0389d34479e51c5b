//! API handlers for the CFS tracker REST endpoints

pub mod auth;
pub mod contact;
pub mod donations;
pub mod health;
pub mod inventory;
pub mod openapi;
pub mod school_requests;
pub mod schools;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::{
    error::AppError,
    models::user::{AuthUser, TokenClaims},
    AppState,
};

/// Extractor for the caller identity, from the provider's bearer token
pub struct AuthenticatedUser(pub AuthUser);

/// Like `AuthenticatedUser`, but anonymous calls pass with `None`.
/// A token that is present but invalid is still rejected.
pub struct OptionalUser(pub Option<AuthUser>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let header = match parts.headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?,
        None => return Ok(None),
    };

    header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))
}

fn resolve_user(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let auth = &state.config.auth;
    let claims = TokenClaims::from_token(token, &auth.jwt_secret, auth.audience.as_deref())
        .map_err(|e| AppError::Authentication(e.to_string()))?;
    Ok(AuthUser::from(claims))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;
        Ok(AuthenticatedUser(resolve_user(token, state)?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(OptionalUser(Some(resolve_user(token, state)?))),
            None => Ok(OptionalUser(None)),
        }
    }
}

/// Message-only response body
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
