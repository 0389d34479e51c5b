//! Donation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::donation::{
        CreateDonation, Donation, DonationPage, DonationQuery, DonationStats, UpdateDonationStatus,
    },
    AppState,
};

use super::{AuthenticatedUser, OptionalUser};

/// Submit a donation (anonymous or signed in)
#[utoipa::path(
    post,
    path = "/donations",
    tag = "donations",
    request_body = CreateDonation,
    responses(
        (status = 201, description = "Donation recorded as pending", body = Donation),
        (status = 400, description = "Invalid donation", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_donation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(data): Json<CreateDonation>,
) -> AppResult<(StatusCode, Json<Donation>)> {
    let donation = state.services.donations.create(data, user.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

/// List all donations
#[utoipa::path(
    get,
    path = "/donations",
    tag = "donations",
    security(("bearer_auth" = [])),
    params(DonationQuery),
    responses(
        (status = 200, description = "Page of donations", body = DonationPage),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_donations(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<DonationQuery>,
) -> AppResult<Json<DonationPage>> {
    user.require_admin()?;
    Ok(Json(state.services.donations.list(&query).await?))
}

/// Donations submitted by the caller
#[utoipa::path(
    get,
    path = "/donations/mine",
    tag = "donations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's donations", body = Vec<Donation>)
    )
)]
pub async fn my_donations(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<Vec<Donation>>> {
    Ok(Json(state.services.donations.list_for_user(user.id).await?))
}

/// Donations submitted by a given user
#[utoipa::path(
    get,
    path = "/donations/user/{user_id}",
    tag = "donations",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's donations", body = Vec<Donation>),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn user_donations(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Donation>>> {
    user.require_owner_or_admin(Some(user_id))?;
    Ok(Json(state.services.donations.list_for_user(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/donations/{id}",
    tag = "donations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation", body = Donation),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Donation not found")
    )
)]
pub async fn get_donation(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Donation>> {
    let donation = state.services.donations.get(id).await?;
    user.require_owner_or_admin(donation.user_id)?;
    Ok(Json(donation))
}

/// Donation counters
#[utoipa::path(
    get,
    path = "/donations/stats",
    tag = "donations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Donation statistics", body = DonationStats)
    )
)]
pub async fn donation_stats(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<DonationStats>> {
    user.require_admin()?;
    Ok(Json(state.services.donations.stats().await?))
}

/// Change a donation's status.
///
/// Entering `collected` or `processing` creates the inventory units;
/// approval emails the donor.
#[utoipa::path(
    patch,
    path = "/donations/{id}/status",
    tag = "donations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Donation ID")),
    request_body = UpdateDonationStatus,
    responses(
        (status = 200, description = "Updated donation", body = Donation),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Donation not found"),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_donation_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<UpdateDonationStatus>,
) -> AppResult<Json<Donation>> {
    user.require_admin()?;
    let donation = state
        .services
        .status
        .apply_donation_status(id, &data.status, data.collection_date)
        .await?;
    Ok(Json(donation))
}
