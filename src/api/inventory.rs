//! Inventory and fulfillment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        enums::RequestStatus,
        inventory::{FulfillRequest, InventoryItem, InventoryListEntry, InventoryQuery, UpdateInventoryItem},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Fulfillment result
#[derive(Serialize, ToSchema)]
pub struct FulfillResponse {
    pub message: String,
    /// Units assigned to the request so far
    pub assigned_count: i64,
    /// Units the school asked for
    pub quantity: i64,
    pub request_status: RequestStatus,
}

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventory units, newest first", body = Vec<InventoryListEntry>),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<InventoryQuery>,
) -> AppResult<Json<Vec<InventoryListEntry>>> {
    user.require_admin()?;
    Ok(Json(state.services.inventory.list(&query).await?))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Inventory unit ID")),
    responses(
        (status = 200, description = "Inventory unit", body = InventoryItem),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    user.require_admin()?;
    Ok(Json(state.services.inventory.get(id).await?))
}

/// Record refurbishment of a unit
#[utoipa::path(
    patch,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Inventory unit ID")),
    request_body = UpdateInventoryItem,
    responses(
        (status = 200, description = "Updated unit", body = InventoryItem),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Unit not found"),
        (status = 409, description = "Transition not allowed or serial number taken", body = crate::error::ErrorResponse),
        (status = 422, description = "Units are delivered through fulfillment", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_inventory_item(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<UpdateInventoryItem>,
) -> AppResult<Json<InventoryItem>> {
    user.require_admin()?;
    Ok(Json(state.services.inventory.refurbish(id, data).await?))
}

/// Deliver inventory units to a school request.
///
/// The request becomes `fulfilled` once the units assigned to it reach the
/// requested quantity; several calls may be needed.
#[utoipa::path(
    post,
    path = "/inventory/fulfill",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = FulfillRequest,
    responses(
        (status = 200, description = "Units delivered", body = FulfillResponse),
        (status = 400, description = "No units given", body = crate::error::ErrorResponse),
        (status = 404, description = "Request or unit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn fulfill_request(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(data): Json<FulfillRequest>,
) -> AppResult<Json<FulfillResponse>> {
    user.require_admin()?;
    let outcome = state.services.fulfillment.fulfill(data).await?;

    let message = if outcome.request_status == RequestStatus::Fulfilled {
        format!("{} unit(s) delivered, request fulfilled", outcome.delivered)
    } else {
        format!(
            "{} unit(s) delivered, {} of {} assigned",
            outcome.delivered, outcome.assigned_count, outcome.quantity
        )
    };

    Ok(Json(FulfillResponse {
        message,
        assigned_count: outcome.assigned_count,
        quantity: outcome.quantity,
        request_status: outcome.request_status,
    }))
}
