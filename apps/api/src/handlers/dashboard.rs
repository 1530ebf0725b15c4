use axum::Json;
use axum::extract::{Extension, Query, State};
use schooldesk_core::RoleClaims;
use serde::Deserialize;

use crate::dto::{AccessDecisionResponse, DashboardSummaryResponse, MeResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub path: String,
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> Json<MeResponse> {
    let navigation = state.access_service.navigation_for(claims.role());
    Json(MeResponse::new(&claims, navigation))
}

/// Answers whether the caller may open a page, without opening it.
pub async fn access_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Query(query): Query<AccessQuery>,
) -> Json<AccessDecisionResponse> {
    let authorized = state
        .access_service
        .classify(Some(&claims), query.path.as_str())
        .is_authorized();
    let allowed_roles = state.access_service.allowed_roles(query.path.as_str());

    Json(AccessDecisionResponse::new(
        query.path,
        authorized,
        &allowed_roles,
    ))
}

pub async fn summary_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<DashboardSummaryResponse>> {
    let summary = state.dashboard_service.summary(&claims).await?;
    Ok(Json(DashboardSummaryResponse::from(summary)))
}
