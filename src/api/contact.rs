//! Contact form endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::contact::{ContactMessage, ContactPage, ContactQuery, CreateContactMessage, UpdateContactStatus},
    AppState,
};

use super::{AuthenticatedUser, MessageResponse};

#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = CreateContactMessage,
    responses(
        (status = 201, description = "Message received", body = MessageResponse),
        (status = 400, description = "Invalid message", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_message(
    State(state): State<AppState>,
    Json(data): Json<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state.services.contact.submit(data).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Message sent successfully".to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/contact",
    tag = "contact",
    security(("bearer_auth" = [])),
    params(ContactQuery),
    responses(
        (status = 200, description = "Page of messages", body = ContactPage),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ContactQuery>,
) -> AppResult<Json<ContactPage>> {
    user.require_admin()?;
    Ok(Json(state.services.contact.list(&query).await?))
}

#[utoipa::path(
    patch,
    path = "/contact/{id}/status",
    tag = "contact",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Message ID")),
    request_body = UpdateContactStatus,
    responses(
        (status = 200, description = "Updated message", body = ContactMessage),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Message not found")
    )
)]
pub async fn update_message_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(data): Json<UpdateContactStatus>,
) -> AppResult<Json<ContactMessage>> {
    user.require_admin()?;
    Ok(Json(state.services.contact.set_status(id, &data.status).await?))
}
