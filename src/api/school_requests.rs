//! School request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::UserRole,
        school_request::{
            CreateSchoolRequest, SchoolRequest, SchoolRequestPage, SchoolRequestQuery,
            SchoolRequestStats, UpdateRequestStatus,
        },
    },
    AppState,
};

use super::AuthenticatedUser;

/// Submit an equipment request (school accounts)
#[utoipa::path(
    post,
    path = "/schools/requests",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "Request recorded as pending", body = SchoolRequest),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 403, description = "Only school accounts may submit")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(data): Json<CreateSchoolRequest>,
) -> AppResult<(StatusCode, Json<SchoolRequest>)> {
    user.require_role(UserRole::School)?;
    let request = state.services.school_requests.create(data, &user).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/schools/requests",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    params(SchoolRequestQuery),
    responses(
        (status = 200, description = "Page of requests", body = SchoolRequestPage),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<SchoolRequestQuery>,
) -> AppResult<Json<SchoolRequestPage>> {
    user.require_admin()?;
    Ok(Json(state.services.school_requests.list(&query).await?))
}

#[utoipa::path(
    get,
    path = "/schools/requests/mine",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's requests", body = Vec<SchoolRequest>)
    )
)]
pub async fn my_requests(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<Vec<SchoolRequest>>> {
    Ok(Json(state.services.school_requests.list_for_user(user.id).await?))
}

#[utoipa::path(
    get,
    path = "/schools/requests/user/{user_id}",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's requests", body = Vec<SchoolRequest>),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn user_requests(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<SchoolRequest>>> {
    user.require_owner_or_admin(Some(user_id))?;
    Ok(Json(state.services.school_requests.list_for_user(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/schools/requests/{id}",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Request ID")),
    responses(
        (status = 200, description = "School request", body = SchoolRequest),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SchoolRequest>> {
    let request = state.services.school_requests.get(id).await?;
    user.require_owner_or_admin(Some(request.user_id))?;
    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/schools/requests/stats",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Request statistics", body = SchoolRequestStats)
    )
)]
pub async fn request_stats(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<SchoolRequestStats>> {
    user.require_admin()?;
    Ok(Json(state.services.school_requests.stats().await?))
}

/// Approve or reject a request. The school is emailed about the outcome.
#[utoipa::path(
    patch,
    path = "/schools/requests/{id}/status",
    tag = "school-requests",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Updated request", body = SchoolRequest),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse),
        (status = 422, description = "Use inventory fulfillment to mark a request fulfilled", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<UpdateRequestStatus>,
) -> AppResult<Json<SchoolRequest>> {
    user.require_admin()?;
    let request = state
        .services
        .status
        .apply_request_status(id, &data.status, data.admin_comment.as_deref())
        .await?;
    Ok(Json(request))
}
