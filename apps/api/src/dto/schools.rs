use chrono::{DateTime, Utc};
use schooldesk_application::{ProvisionSchoolInput, SubscriptionInput};
use schooldesk_core::AppError;
use schooldesk_domain::{School, SchoolStatus};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming school provisioning payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-school-request.ts"
)]
pub struct CreateSchoolRequest {
    pub name: String,
    pub address: Option<String>,
    pub max_students: u32,
    pub max_teachers: u32,
    #[ts(type = "string")]
    pub expiry: DateTime<Utc>,
}

impl From<CreateSchoolRequest> for ProvisionSchoolInput {
    fn from(value: CreateSchoolRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
            max_students: value.max_students,
            max_teachers: value.max_teachers,
            expiry: value.expiry,
        }
    }
}

/// Incoming subscription replacement payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-subscription-request.ts"
)]
pub struct UpdateSubscriptionRequest {
    pub max_students: u32,
    pub max_teachers: u32,
    #[ts(type = "string")]
    pub expiry: DateTime<Utc>,
}

impl From<UpdateSubscriptionRequest> for SubscriptionInput {
    fn from(value: UpdateSubscriptionRequest) -> Self {
        Self {
            max_students: value.max_students,
            max_teachers: value.max_teachers,
            expiry: value.expiry,
        }
    }
}

/// Incoming school status payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-school-status-request.ts"
)]
pub struct UpdateSchoolStatusRequest {
    #[ts(type = "\"active\" | \"disabled\"")]
    pub status: String,
}

impl TryFrom<UpdateSchoolStatusRequest> for SchoolStatus {
    type Error = AppError;

    fn try_from(value: UpdateSchoolStatusRequest) -> Result<Self, Self::Error> {
        value.status.parse()
    }
}

/// API representation of a school.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/school-response.ts"
)]
pub struct SchoolResponse {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub code: String,
    pub status: String,
    pub max_students: u32,
    pub max_teachers: u32,
    #[ts(type = "string")]
    pub expiry: DateTime<Utc>,
    pub subscription_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<School> for SchoolResponse {
    fn from(value: School) -> Self {
        let subscription = value.subscription();
        Self {
            id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            address: value.address().map(str::to_owned),
            code: value.code().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            max_students: subscription.max_students(),
            max_teachers: subscription.max_teachers(),
            expiry: subscription.expiry(),
            subscription_active: subscription.is_active_at(Utc::now()),
            created_at: value.created_at(),
        }
    }
}
