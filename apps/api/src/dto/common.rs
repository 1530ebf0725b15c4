use chrono::{DateTime, Utc};
use schooldesk_application::{DashboardSummary, SubscriptionOverview};
use schooldesk_core::{RoleClaims, UserRole};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Publication toggle shared by results and notices.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-request.ts"
)]
pub struct PublishRequest {
    pub published: bool,
}

/// Session owner and the pages their role may open.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub subject: String,
    #[ts(type = "\"master\" | \"admin\" | \"teacher\" | \"student\"")]
    pub role: String,
    pub school_id: Option<String>,
    pub subscription_active: bool,
    pub navigation: Vec<String>,
}

impl MeResponse {
    pub fn new(claims: &RoleClaims, navigation: Vec<String>) -> Self {
        Self {
            subject: claims.subject().to_owned(),
            role: claims.role().as_str().to_owned(),
            school_id: claims.school_id().map(|school_id| school_id.to_string()),
            subscription_active: claims.subscription_active(),
            navigation,
        }
    }
}

/// Access decision for one page path.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-decision-response.ts"
)]
pub struct AccessDecisionResponse {
    pub path: String,
    pub authorized: bool,
    pub allowed_roles: Vec<String>,
}

impl AccessDecisionResponse {
    pub fn new(path: String, authorized: bool, allowed_roles: &[UserRole]) -> Self {
        Self {
            path,
            authorized,
            allowed_roles: allowed_roles
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }
}

/// Subscription state and seat usage of one school.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subscription-overview-response.ts"
)]
pub struct SubscriptionOverviewResponse {
    pub school_id: String,
    pub school_name: String,
    pub status: String,
    pub active: bool,
    #[ts(type = "string")]
    pub expiry: DateTime<Utc>,
    #[ts(type = "number")]
    pub days_until_expiry: i64,
    #[ts(type = "number")]
    pub students_enrolled: u64,
    pub max_students: u32,
    #[ts(type = "number")]
    pub teachers_employed: u64,
    pub max_teachers: u32,
}

impl From<SubscriptionOverview> for SubscriptionOverviewResponse {
    fn from(value: SubscriptionOverview) -> Self {
        Self {
            school_id: value.school_id.to_string(),
            school_name: value.school_name,
            status: value.status.as_str().to_owned(),
            active: value.active,
            expiry: value.expiry,
            days_until_expiry: value.days_until_expiry,
            students_enrolled: value.students_enrolled,
            max_students: value.max_students,
            teachers_employed: value.teachers_employed,
            max_teachers: value.max_teachers,
        }
    }
}

/// Dashboard landing page figures.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-summary-response.ts"
)]
pub struct DashboardSummaryResponse {
    pub role: String,
    pub subscription: Option<SubscriptionOverviewResponse>,
    #[ts(type = "number | null")]
    pub student_count: Option<u64>,
    #[ts(type = "number | null")]
    pub teacher_count: Option<u64>,
    #[ts(type = "number | null")]
    pub pending_payment_count: Option<u64>,
}

impl From<DashboardSummary> for DashboardSummaryResponse {
    fn from(value: DashboardSummary) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            subscription: value.subscription.map(SubscriptionOverviewResponse::from),
            student_count: value.student_count,
            teacher_count: value.teacher_count,
            pending_payment_count: value.pending_payment_count,
        }
    }
}
