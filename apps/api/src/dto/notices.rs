use chrono::{DateTime, Utc};
use schooldesk_application::{CreateNoticeInput, NoticeDraftRequest};
use schooldesk_core::AppError;
use schooldesk_domain::Notice;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming notice payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-notice-request.ts"
)]
pub struct CreateNoticeRequest {
    pub title: String,
    pub content: String,
    #[ts(type = "\"all\" | \"teacher\" | \"student\" | \"class\"")]
    pub audience: String,
    #[ts(type = "string | null")]
    pub class_details: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl TryFrom<CreateNoticeRequest> for CreateNoticeInput {
    type Error = AppError;

    fn try_from(value: CreateNoticeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            content: value.content,
            audience: value.audience.parse()?,
            class_details: value.class_details,
            published: value.published,
        })
    }
}

/// Incoming request for generated notice content.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/draft-notice-request.ts"
)]
pub struct DraftNoticeRequest {
    pub title: String,
    #[ts(type = "\"all\" | \"teacher\" | \"student\" | \"class\"")]
    pub audience: String,
    #[ts(type = "string | null")]
    pub class_details: Option<String>,
}

impl TryFrom<DraftNoticeRequest> for NoticeDraftRequest {
    type Error = AppError;

    fn try_from(value: DraftNoticeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            audience: value.audience.parse()?,
            class_details: value.class_details,
        })
    }
}

/// Generated notice body.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/draft-notice-response.ts"
)]
pub struct DraftNoticeResponse {
    pub content: String,
}

/// API representation of a notice.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/notice-response.ts"
)]
pub struct NoticeResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub audience: String,
    #[ts(type = "string | null")]
    pub class_details: Option<String>,
    pub published: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Notice> for NoticeResponse {
    fn from(value: Notice) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            title: value.title().as_str().to_owned(),
            content: value.content().as_str().to_owned(),
            audience: value.audience().as_str().to_owned(),
            class_details: value
                .class_details()
                .map(|class| class.as_str().to_owned()),
            published: value.published(),
            created_at: value.created_at(),
        }
    }
}
