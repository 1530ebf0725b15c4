//! School provisioning and subscription management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use schooldesk_core::{AppError, AppResult, RoleClaims, TenantId, UserRole};
use schooldesk_domain::{
    LoginCodeKind, School, SchoolStatus, Subscription, days_until_expiry,
};

use crate::login_codes::generate_unique_login_code;
use crate::{RosterRepository, SchoolRepository};

/// Input payload for provisioning a school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSchoolInput {
    /// School name, at least three characters.
    pub name: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Student seat limit.
    pub max_students: u32,
    /// Teacher seat limit.
    pub max_teachers: u32,
    /// Subscription expiry.
    pub expiry: DateTime<Utc>,
}

/// Input payload for replacing subscription terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionInput {
    /// Student seat limit.
    pub max_students: u32,
    /// Teacher seat limit.
    pub max_teachers: u32,
    /// Subscription expiry.
    pub expiry: DateTime<Utc>,
}

/// Subscription state of one school at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOverview {
    /// School id.
    pub school_id: TenantId,
    /// School name.
    pub school_name: String,
    /// Operating status.
    pub status: SchoolStatus,
    /// Whether the subscription is active now, derived from the expiry.
    pub active: bool,
    /// Expiry instant.
    pub expiry: DateTime<Utc>,
    /// Whole days until expiry, negative once lapsed.
    pub days_until_expiry: i64,
    /// Students enrolled.
    pub students_enrolled: u64,
    /// Student seat limit.
    pub max_students: u32,
    /// Teachers employed.
    pub teachers_employed: u64,
    /// Teacher seat limit.
    pub max_teachers: u32,
}

/// Application service for school tenants.
#[derive(Clone)]
pub struct SchoolService {
    schools: Arc<dyn SchoolRepository>,
    roster: Arc<dyn RosterRepository>,
}

impl SchoolService {
    /// Creates a new school service.
    #[must_use]
    pub fn new(schools: Arc<dyn SchoolRepository>, roster: Arc<dyn RosterRepository>) -> Self {
        Self { schools, roster }
    }

    /// Provisions a new active school with a fresh login code.
    pub async fn provision_school(
        &self,
        actor: &RoleClaims,
        input: ProvisionSchoolInput,
    ) -> AppResult<School> {
        actor.require_role(&[UserRole::Master])?;

        let subscription = Subscription::new(input.max_students, input.max_teachers, input.expiry)?;
        let existing = self.schools.list_schools().await?;
        let code = generate_unique_login_code(LoginCodeKind::School, |code| {
            existing.iter().any(|school| school.code() == code)
        })?;
        let school = School::new(
            TenantId::new(),
            input.name,
            input.address,
            code,
            SchoolStatus::Active,
            subscription,
            Utc::now(),
        )?;

        self.schools.create_school(school.clone()).await?;
        info!(
            school_id = %school.id(),
            code = %school.code(),
            "school provisioned"
        );

        Ok(school)
    }

    /// Lists every school ordered by name.
    pub async fn list_schools(&self, actor: &RoleClaims) -> AppResult<Vec<School>> {
        actor.require_role(&[UserRole::Master])?;

        let mut schools = self.schools.list_schools().await?;
        schools.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(schools)
    }

    /// Finds a school. Only the platform owner may read other schools.
    pub async fn find_school(&self, actor: &RoleClaims, school_id: TenantId) -> AppResult<School> {
        if actor.role() != UserRole::Master && actor.school_id() != Some(school_id) {
            return Err(AppError::Forbidden(format!(
                "subject '{}' may not read school '{school_id}'",
                actor.subject()
            )));
        }

        self.load_school(school_id).await
    }

    /// Replaces the subscription terms of a school.
    pub async fn update_subscription(
        &self,
        actor: &RoleClaims,
        school_id: TenantId,
        input: SubscriptionInput,
    ) -> AppResult<School> {
        actor.require_role(&[UserRole::Master])?;

        let mut school = self.load_school(school_id).await?;
        school.set_subscription(Subscription::new(
            input.max_students,
            input.max_teachers,
            input.expiry,
        )?);
        self.schools.save_school(school.clone()).await?;
        info!(%school_id, expiry = %input.expiry, "subscription updated");

        Ok(school)
    }

    /// Switches a school on or off.
    pub async fn set_school_status(
        &self,
        actor: &RoleClaims,
        school_id: TenantId,
        status: SchoolStatus,
    ) -> AppResult<School> {
        actor.require_role(&[UserRole::Master])?;

        let mut school = self.load_school(school_id).await?;
        school.set_status(status);
        self.schools.save_school(school.clone()).await?;
        info!(%school_id, status = status.as_str(), "school status changed");

        Ok(school)
    }

    /// Returns the subscription overview of the actor's school.
    ///
    /// The active flag is recomputed from the stored expiry rather than read
    /// from the session claims, which may be stale.
    pub async fn subscription_overview(&self, actor: &RoleClaims) -> AppResult<SubscriptionOverview> {
        let school_id = actor.require_school()?;
        let school = self.load_school(school_id).await?;
        let now = Utc::now();
        let subscription = school.subscription();

        Ok(SubscriptionOverview {
            school_id,
            school_name: school.name().as_str().to_owned(),
            status: school.status(),
            active: subscription.is_active_at(now),
            expiry: subscription.expiry(),
            days_until_expiry: days_until_expiry(subscription.expiry(), now),
            students_enrolled: self.roster.count_students(school_id).await?,
            max_students: subscription.max_students(),
            teachers_employed: self.roster.count_teachers(school_id).await?,
            max_teachers: subscription.max_teachers(),
        })
    }

    async fn load_school(&self, school_id: TenantId) -> AppResult<School> {
        self.schools
            .find_school(school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("school '{school_id}' does not exist")))
    }
}
