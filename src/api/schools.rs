//! School directory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::school::{School, SchoolPage, SchoolQuery},
    AppState,
};

#[utoipa::path(
    get,
    path = "/schools",
    tag = "schools",
    params(SchoolQuery),
    responses(
        (status = 200, description = "Page of schools", body = SchoolPage)
    )
)]
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<SchoolQuery>,
) -> AppResult<Json<SchoolPage>> {
    Ok(Json(state.services.schools.list(&query).await?))
}

#[utoipa::path(
    get,
    path = "/schools/{id}",
    tag = "schools",
    params(("id" = i64, Path, description = "School ID")),
    responses(
        (status = 200, description = "School", body = School),
        (status = 404, description = "School not found")
    )
)]
pub async fn get_school(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<School>> {
    Ok(Json(state.services.schools.get(id).await?))
}
