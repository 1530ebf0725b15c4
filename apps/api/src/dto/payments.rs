use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schooldesk_application::SubmitPaymentInput;
use schooldesk_core::AppError;
use schooldesk_domain::{Payment, PaymentDecision, PaymentReceipt};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming fee payment payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-payment-request.ts"
)]
pub struct SubmitPaymentRequest {
    #[ts(type = "number")]
    pub amount: Decimal,
    #[ts(type = "\"Stripe\" | \"PayPal\" | \"Bank Transfer\" | \"Cash\"")]
    pub method: String,
    pub trx: String,
}

impl TryFrom<SubmitPaymentRequest> for SubmitPaymentInput {
    type Error = AppError;

    fn try_from(value: SubmitPaymentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: value.amount,
            method: value.method.parse()?,
            trx: value.trx,
        })
    }
}

/// Incoming administrator decision on a pending payment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/payment-decision-request.ts"
)]
pub struct PaymentDecisionRequest {
    #[ts(type = "\"approve\" | \"reject\"")]
    pub decision: String,
}

impl TryFrom<PaymentDecisionRequest> for PaymentDecision {
    type Error = AppError;

    fn try_from(value: PaymentDecisionRequest) -> Result<Self, Self::Error> {
        match value.decision.trim() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(AppError::Validation(format!(
                "unknown payment decision '{other}'"
            ))),
        }
    }
}

/// API representation of a payment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/payment-response.ts"
)]
pub struct PaymentResponse {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub method: String,
    pub trx: String,
    #[ts(type = "\"pending\" | \"approved\" | \"rejected\"")]
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string | null")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<Payment> for PaymentResponse {
    fn from(value: Payment) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            student_id: value.student_id().as_str().to_owned(),
            student_name: value.student_name().as_str().to_owned(),
            amount: value.amount(),
            method: value.method().as_str().to_owned(),
            trx: value.trx().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            created_at: value.created_at(),
            approved_at: value.approved_at(),
        }
    }
}

/// Receipt for an approved payment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/payment-receipt-response.ts"
)]
pub struct PaymentReceiptResponse {
    pub receipt_number: String,
    pub student_id: String,
    pub student_name: String,
    #[ts(type = "string")]
    pub amount: Decimal,
    pub method: String,
    #[ts(type = "string")]
    pub approved_at: DateTime<Utc>,
}

impl From<PaymentReceipt> for PaymentReceiptResponse {
    fn from(value: PaymentReceipt) -> Self {
        Self {
            receipt_number: value.receipt_number,
            student_id: value.student_id.as_str().to_owned(),
            student_name: value.student_name,
            amount: value.amount,
            method: value.method.as_str().to_owned(),
            approved_at: value.approved_at,
        }
    }
}
