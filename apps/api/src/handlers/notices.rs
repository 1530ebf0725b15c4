use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use schooldesk_application::{CreateNoticeInput, NoticeDraftRequest};
use schooldesk_core::RoleClaims;
use schooldesk_domain::NoticeId;

use crate::dto::{
    CreateNoticeRequest, DraftNoticeRequest, DraftNoticeResponse, NoticeResponse, PublishRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notices_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<NoticeResponse>>> {
    let notices = state
        .notice_service
        .list_notices(&claims)
        .await?
        .into_iter()
        .map(NoticeResponse::from)
        .collect();

    Ok(Json(notices))
}

pub async fn create_notice_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<CreateNoticeRequest>,
) -> ApiResult<(StatusCode, Json<NoticeResponse>)> {
    let input = CreateNoticeInput::try_from(payload)?;
    let notice = state.notice_service.create_notice(&claims, input).await?;

    Ok((StatusCode::CREATED, Json(NoticeResponse::from(notice))))
}

pub async fn set_notice_published_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(notice_id): Path<String>,
    Json(payload): Json<PublishRequest>,
) -> ApiResult<Json<NoticeResponse>> {
    let notice_id = NoticeId::new(notice_id)?;
    let notice = state
        .notice_service
        .set_notice_published(&claims, &notice_id, payload.published)
        .await?;

    Ok(Json(NoticeResponse::from(notice)))
}

pub async fn draft_notice_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<DraftNoticeRequest>,
) -> ApiResult<Json<DraftNoticeResponse>> {
    let request = NoticeDraftRequest::try_from(payload)?;
    let content = state
        .notice_service
        .draft_notice_content(&claims, request)
        .await?;

    Ok(Json(DraftNoticeResponse { content }))
}
