use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use schooldesk_application::SubmitPaymentInput;
use schooldesk_core::RoleClaims;
use schooldesk_domain::{PaymentDecision, PaymentId};

use crate::dto::{
    PaymentDecisionRequest, PaymentReceiptResponse, PaymentResponse, SubmitPaymentRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn submit_payment_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Json(payload): Json<SubmitPaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentResponse>)> {
    let input = SubmitPaymentInput::try_from(payload)?;
    let payment = state.payment_service.submit_payment(&claims, input).await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

pub async fn list_payments_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<PaymentResponse>>> {
    let payments = state
        .payment_service
        .list_payments(&claims)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(Json(payments))
}

pub async fn decide_payment_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(payment_id): Path<String>,
    Json(payload): Json<PaymentDecisionRequest>,
) -> ApiResult<Json<PaymentResponse>> {
    let payment_id = PaymentId::new(payment_id)?;
    let decision = PaymentDecision::try_from(payload)?;
    let payment = state
        .payment_service
        .decide_payment(&claims, &payment_id, decision)
        .await?;

    Ok(Json(PaymentResponse::from(payment)))
}

pub async fn list_my_payments_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
) -> ApiResult<Json<Vec<PaymentResponse>>> {
    let payments = state
        .payment_service
        .list_my_payments(&claims)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(Json(payments))
}

pub async fn payment_receipt_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<RoleClaims>,
    Path(payment_id): Path<String>,
) -> ApiResult<Json<PaymentReceiptResponse>> {
    let payment_id = PaymentId::new(payment_id)?;
    let receipt = state
        .payment_service
        .payment_receipt(&claims, &payment_id)
        .await?;

    Ok(Json(PaymentReceiptResponse::from(receipt)))
}
