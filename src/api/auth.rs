//! Identity endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{AuthUser, User},
    AppState,
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct MeResponse {
    /// Identity resolved from the token
    pub user: AuthUser,
    /// Stored profile, once the account has submitted something
    pub profile: Option<User>,
}

/// Identity resolved from the bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let profile = state.repository.users.find_by_id(user.id).await?;
    Ok(Json(MeResponse { user, profile }))
}
