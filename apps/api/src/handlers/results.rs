use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use schooldesk_core::RoleClaims;
use schooldesk_domain::ResultId;

use crate::dto::{
    GradeSheetResponse, PreviewGpaRequest, PublishRequest, RecordResultRequest, ResultResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn record_result_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<RecordResultRequest>,
) -> ApiResult<(StatusCode, Json<ResultResponse>)> {
    let result = state
        .result_service
        .record_result(&claims, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ResultResponse::from(result))))
}

pub async fn preview_gpa_handler(
    State(state): State<AppState>,
    Json(payload): Json<PreviewGpaRequest>,
) -> ApiResult<Json<GradeSheetResponse>> {
    let sheet = state
        .result_service
        .preview_gpa(payload.into_inputs().as_slice())?;

    Ok(Json(GradeSheetResponse::from(sheet)))
}

pub async fn list_results_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<ResultResponse>>> {
    let results = state
        .result_service
        .list_results(&claims)
        .await?
        .into_iter()
        .map(ResultResponse::from)
        .collect();

    Ok(Json(results))
}

pub async fn set_result_published_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(result_id): Path<String>,
    Json(payload): Json<PublishRequest>,
) -> ApiResult<Json<ResultResponse>> {
    let result_id = ResultId::new(result_id)?;
    let result = state
        .result_service
        .set_result_published(&claims, &result_id, payload.published)
        .await?;

    Ok(Json(ResultResponse::from(result)))
}

pub async fn list_my_results_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<ResultResponse>>> {
    let results = state
        .result_service
        .list_my_results(&claims)
        .await?
        .into_iter()
        .map(ResultResponse::from)
        .collect();

    Ok(Json(results))
}
