//! Dashboard landing page figures.

use std::sync::Arc;

use schooldesk_core::{AppResult, RoleClaims, UserRole};
use schooldesk_domain::PaymentStatus;

use crate::{PaymentRepository, RosterRepository, SchoolService, SubscriptionOverview};

/// Landing page figures for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Role the summary was built for.
    pub role: UserRole,
    /// Subscription overview of the caller's school. None for the platform owner.
    pub subscription: Option<SubscriptionOverview>,
    /// Enrolled students, administrators only.
    pub student_count: Option<u64>,
    /// Employed teachers, administrators only.
    pub teacher_count: Option<u64>,
    /// Payments awaiting a decision, administrators only.
    pub pending_payment_count: Option<u64>,
}

/// Application service composing the dashboard landing page.
#[derive(Clone)]
pub struct DashboardService {
    school_service: SchoolService,
    roster: Arc<dyn RosterRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    #[must_use]
    pub fn new(
        school_service: SchoolService,
        roster: Arc<dyn RosterRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self {
            school_service,
            roster,
            payments,
        }
    }

    /// Builds the summary for the caller's role.
    pub async fn summary(&self, actor: &RoleClaims) -> AppResult<DashboardSummary> {
        let role = actor.role();
        if role == UserRole::Master {
            return Ok(DashboardSummary {
                role,
                subscription: None,
                student_count: None,
                teacher_count: None,
                pending_payment_count: None,
            });
        }

        let subscription = self.school_service.subscription_overview(actor).await?;
        if role != UserRole::Admin {
            return Ok(DashboardSummary {
                role,
                subscription: Some(subscription),
                student_count: None,
                teacher_count: None,
                pending_payment_count: None,
            });
        }

        let school_id = subscription.school_id;
        let pending = self
            .payments
            .list_payments(school_id)
            .await?
            .iter()
            .filter(|payment| payment.status() == PaymentStatus::Pending)
            .count() as u64;

        Ok(DashboardSummary {
            role,
            student_count: Some(self.roster.count_students(school_id).await?),
            teacher_count: Some(self.roster.count_teachers(school_id).await?),
            pending_payment_count: Some(pending),
            subscription: Some(subscription),
        })
    }
}
