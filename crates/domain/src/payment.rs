//! Student payments and their approval lifecycle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schooldesk_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};

use crate::identifiers::{PaymentId, StudentId};

/// Minimum characters in a transaction reference.
pub const TRX_MIN_LENGTH: usize = 6;

/// Channel a payment was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Card payment through Stripe.
    Stripe,
    /// PayPal transfer.
    PayPal,
    /// Bank transfer.
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    /// Cash at the school office.
    Cash,
}

impl PaymentMethod {
    /// Returns the display and storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "Stripe",
            Self::PayPal => "PayPal",
            Self::BankTransfer => "Bank Transfer",
            Self::Cash => "Cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Stripe" => Ok(Self::Stripe),
            "PayPal" => Ok(Self::PayPal),
            "Bank Transfer" => Ok(Self::BankTransfer),
            "Cash" => Ok(Self::Cash),
            _ => Err(AppError::Validation(format!(
                "unknown payment method '{value}'"
            ))),
        }
    }
}

/// Review state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Accepted by an administrator.
    Approved,
    /// Declined by an administrator.
    Rejected,
}

impl PaymentStatus {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown payment status '{value}'"
            ))),
        }
    }
}

/// Administrator decision on a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDecision {
    /// Accept the payment.
    Approve,
    /// Decline the payment.
    Reject,
}

/// Payment submitted by a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    id: PaymentId,
    student_id: StudentId,
    student_name: NonEmptyString,
    school_id: TenantId,
    amount: Decimal,
    method: PaymentMethod,
    trx: NonEmptyString,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
}

/// Fields of a payment as submitted or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentParts {
    /// Payment id.
    pub id: PaymentId,
    /// Paying student.
    pub student_id: StudentId,
    /// Student name at submission.
    pub student_name: String,
    /// Owning school.
    pub school_id: TenantId,
    /// Paid amount.
    pub amount: Decimal,
    /// Payment channel.
    pub method: PaymentMethod,
    /// Transaction reference.
    pub trx: String,
    /// Review state.
    pub status: PaymentStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Approval time, set only for approved payments.
    pub approved_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates a pending payment.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        id: PaymentId,
        student_id: StudentId,
        student_name: impl Into<String>,
        school_id: TenantId,
        amount: Decimal,
        method: PaymentMethod,
        trx: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::from_parts(PaymentParts {
            id,
            student_id,
            student_name: student_name.into(),
            school_id,
            amount,
            method,
            trx: trx.into(),
            status: PaymentStatus::Pending,
            created_at,
            approved_at: None,
        })
    }

    /// Rebuilds a payment from validated parts.
    pub fn from_parts(parts: PaymentParts) -> AppResult<Self> {
        if parts.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "amount must be greater than zero".to_owned(),
            ));
        }
        let student_name = NonEmptyString::new(parts.student_name)
            .map_err(|_| AppError::Validation("student name must not be empty".to_owned()))?;
        let trx = NonEmptyString::with_min_length("transaction id", parts.trx, TRX_MIN_LENGTH)?;
        let approved_at = match parts.status {
            PaymentStatus::Approved => parts.approved_at,
            PaymentStatus::Pending | PaymentStatus::Rejected => None,
        };

        Ok(Self {
            id: parts.id,
            student_id: parts.student_id,
            student_name,
            school_id: parts.school_id,
            amount: parts.amount,
            method: parts.method,
            trx,
            status: parts.status,
            created_at: parts.created_at,
            approved_at,
        })
    }

    /// Returns the payment id.
    #[must_use]
    pub fn id(&self) -> &PaymentId {
        &self.id
    }

    /// Returns the paying student.
    #[must_use]
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    /// Returns the student name.
    #[must_use]
    pub fn student_name(&self) -> &NonEmptyString {
        &self.student_name
    }

    /// Returns the owning school.
    #[must_use]
    pub fn school_id(&self) -> TenantId {
        self.school_id
    }

    /// Returns the paid amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the payment channel.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Returns the transaction reference.
    #[must_use]
    pub fn trx(&self) -> &NonEmptyString {
        &self.trx
    }

    /// Returns the review state.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Returns the submission time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the approval time.
    #[must_use]
    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Applies an administrator decision. Only pending payments may change.
    pub fn decide(&mut self, decision: PaymentDecision, now: DateTime<Utc>) -> AppResult<()> {
        if self.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "payment '{}' is already {}",
                self.id,
                self.status.as_str()
            )));
        }

        match decision {
            PaymentDecision::Approve => {
                self.status = PaymentStatus::Approved;
                self.approved_at = Some(now);
            }
            PaymentDecision::Reject => self.status = PaymentStatus::Rejected,
        }

        Ok(())
    }
}

/// Receipt data for an approved payment. Layout is left to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Receipt number, the transaction reference.
    pub receipt_number: String,
    /// Paying student id.
    pub student_id: StudentId,
    /// Paying student name.
    pub student_name: String,
    /// Paid amount.
    pub amount: Decimal,
    /// Payment channel.
    pub method: PaymentMethod,
    /// Approval time.
    pub approved_at: DateTime<Utc>,
}

impl PaymentReceipt {
    /// Builds the receipt of an approved payment.
    pub fn for_payment(payment: &Payment) -> AppResult<Self> {
        let approved_at = match (payment.status(), payment.approved_at()) {
            (PaymentStatus::Approved, Some(approved_at)) => approved_at,
            _ => {
                return Err(AppError::Conflict(format!(
                    "payment '{}' has not been approved",
                    payment.id()
                )));
            }
        };

        Ok(Self {
            receipt_number: payment.trx().as_str().to_owned(),
            student_id: payment.student_id().clone(),
            student_name: payment.student_name().as_str().to_owned(),
            amount: payment.amount(),
            method: payment.method(),
            approved_at,
        })
    }
}
