//! Dashboard and reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::stats::{Beneficiary, DashboardResponse, ImpactStatistics, ReportQuery, ReportResponse},
    AppState,
};

use super::AuthenticatedUser;

/// Items waiting for an admin decision
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending counters", body = DashboardResponse),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    user.require_admin()?;
    Ok(Json(state.services.stats.dashboard().await?))
}

/// Public impact figures
#[utoipa::path(
    get,
    path = "/stats/impact-report",
    tag = "stats",
    responses(
        (status = 200, description = "Impact statistics", body = ImpactStatistics)
    )
)]
pub async fn impact_report(State(state): State<AppState>) -> AppResult<Json<ImpactStatistics>> {
    Ok(Json(state.services.stats.impact().await?))
}

#[utoipa::path(
    get,
    path = "/stats/beneficiaries",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Schools that received equipment, most recent first", body = Vec<Beneficiary>)
    )
)]
pub async fn beneficiaries(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<Vec<Beneficiary>>> {
    user.require_admin()?;
    Ok(Json(state.services.stats.beneficiaries().await?))
}

/// Activity report over an optional date range
#[utoipa::path(
    get,
    path = "/stats/reports",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Period report", body = ReportResponse),
        (status = 400, description = "start_date after end_date", body = crate::error::ErrorResponse)
    )
)]
pub async fn reports(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ReportResponse>> {
    user.require_admin()?;
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::BadRequest(
                "start_date must not be after end_date".to_string(),
            ));
        }
    }
    Ok(Json(state.services.stats.report(&query).await?))
}
