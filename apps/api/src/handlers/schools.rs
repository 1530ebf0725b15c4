use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use schooldesk_core::{RoleClaims, TenantId};
use schooldesk_domain::SchoolStatus;

use crate::dto::{
    CreateSchoolRequest, SchoolResponse, UpdateSchoolStatusRequest, UpdateSubscriptionRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_schools_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<SchoolResponse>>> {
    let schools = state
        .school_service
        .list_schools(&claims)
        .await?
        .into_iter()
        .map(SchoolResponse::from)
        .collect();

    Ok(Json(schools))
}

pub async fn create_school_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<CreateSchoolRequest>,
) -> ApiResult<(StatusCode, Json<SchoolResponse>)> {
    let school = state
        .school_service
        .provision_school(&claims, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(SchoolResponse::from(school))))
}

pub async fn get_school_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(school_id): Path<String>,
) -> ApiResult<Json<SchoolResponse>> {
    let school_id = school_id.parse::<TenantId>()?;
    let school = state.school_service.find_school(&claims, school_id).await?;

    Ok(Json(SchoolResponse::from(school)))
}

pub async fn update_subscription_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(school_id): Path<String>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> ApiResult<Json<SchoolResponse>> {
    let school_id = school_id.parse::<TenantId>()?;
    let school = state
        .school_service
        .update_subscription(&claims, school_id, payload.into())
        .await?;

    Ok(Json(SchoolResponse::from(school)))
}

pub async fn update_school_status_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(school_id): Path<String>,
    Json(payload): Json<UpdateSchoolStatusRequest>,
) -> ApiResult<Json<SchoolResponse>> {
    let school_id = school_id.parse::<TenantId>()?;
    let status = SchoolStatus::try_from(payload)?;
    let school = state
        .school_service
        .set_school_status(&claims, school_id, status)
        .await?;

    Ok(Json(SchoolResponse::from(school)))
}
