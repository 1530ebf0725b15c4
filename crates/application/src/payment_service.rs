//! Student payments, administrator decisions and receipts.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use schooldesk_core::{AppError, AppResult, RoleClaims, TenantId, UserRole};
use schooldesk_domain::{
    Payment, PaymentDecision, PaymentId, PaymentMethod, PaymentReceipt, StudentId,
};

use crate::{PaymentRepository, RosterRepository};

/// Input payload for submitting a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPaymentInput {
    /// Paid amount, greater than zero.
    pub amount: Decimal,
    /// Payment channel.
    pub method: PaymentMethod,
    /// Transaction reference, at least six characters.
    pub trx: String,
}

/// Application service for payments.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    roster: Arc<dyn RosterRepository>,
}

impl PaymentService {
    /// Creates a new payment service.
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentRepository>, roster: Arc<dyn RosterRepository>) -> Self {
        Self { payments, roster }
    }

    /// Submits a pending payment for the calling student.
    pub async fn submit_payment(
        &self,
        actor: &RoleClaims,
        input: SubmitPaymentInput,
    ) -> AppResult<Payment> {
        actor.require_role(&[UserRole::Student])?;
        let school_id = actor.require_school()?;
        let student_id = StudentId::new(actor.subject())?;

        let student = self
            .roster
            .find_student(school_id, &student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("student '{student_id}' does not exist")))?;

        let payment = Payment::submit(
            PaymentId::generate(),
            student_id,
            student.name().as_str(),
            school_id,
            input.amount,
            input.method,
            input.trx,
            Utc::now(),
        )?;
        self.payments.create_payment(payment.clone()).await?;
        info!(%school_id, payment_id = %payment.id(), "payment submitted");

        Ok(payment)
    }

    /// Lists every payment of the administrator's school, newest first.
    pub async fn list_payments(&self, actor: &RoleClaims) -> AppResult<Vec<Payment>> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut payments = self.payments.list_payments(school_id).await?;
        newest_first(&mut payments);
        Ok(payments)
    }

    /// Approves or rejects a pending payment.
    pub async fn decide_payment(
        &self,
        actor: &RoleClaims,
        payment_id: &PaymentId,
        decision: PaymentDecision,
    ) -> AppResult<Payment> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let payment = self
            .payments
            .decide_pending_payment(school_id, payment_id, decision, Utc::now())
            .await?;
        info!(
            %school_id,
            %payment_id,
            status = payment.status().as_str(),
            "payment decided"
        );

        Ok(payment)
    }

    /// Lists the calling student's payments, newest first.
    pub async fn list_my_payments(&self, actor: &RoleClaims) -> AppResult<Vec<Payment>> {
        actor.require_role(&[UserRole::Student])?;
        let school_id = actor.require_school()?;
        let student_id = StudentId::new(actor.subject())?;

        let mut payments = self
            .payments
            .list_payments_for_student(school_id, &student_id)
            .await?;
        newest_first(&mut payments);
        Ok(payments)
    }

    /// Returns the receipt of one of the calling student's approved payments.
    pub async fn payment_receipt(
        &self,
        actor: &RoleClaims,
        payment_id: &PaymentId,
    ) -> AppResult<PaymentReceipt> {
        actor.require_role(&[UserRole::Student])?;
        let school_id = actor.require_school()?;

        let payment = self.load_payment(school_id, payment_id).await?;
        if payment.student_id().as_str() != actor.subject() {
            return Err(AppError::NotFound(format!(
                "payment '{payment_id}' does not exist"
            )));
        }

        PaymentReceipt::for_payment(&payment)
    }

    async fn load_payment(&self, school_id: TenantId, payment_id: &PaymentId) -> AppResult<Payment> {
        self.payments
            .find_payment(school_id, payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("payment '{payment_id}' does not exist")))
    }
}

fn newest_first(payments: &mut [Payment]) {
    payments.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
}
