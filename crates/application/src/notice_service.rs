//! Notice publishing and drafting.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use schooldesk_core::{AppError, AppResult, RoleClaims, UserRole};
use schooldesk_domain::{Notice, NoticeAudience, NoticeId, NoticeParts};

use crate::{NoticeDraftGenerator, NoticeDraftRequest, NoticeRepository};

/// Message shown when drafting fails for any reason.
pub const DRAFT_FAILED_MESSAGE: &str = "failed to generate content, please try again";

/// Input payload for creating a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNoticeInput {
    /// Title, at least five characters.
    pub title: String,
    /// Body, at least twenty characters.
    pub content: String,
    /// Addressed readers.
    pub audience: NoticeAudience,
    /// Target class for class notices.
    pub class_details: Option<String>,
    /// Publish immediately.
    pub published: bool,
}

/// Application service for notices.
#[derive(Clone)]
pub struct NoticeService {
    notices: Arc<dyn NoticeRepository>,
    drafter: Arc<dyn NoticeDraftGenerator>,
}

impl NoticeService {
    /// Creates a new notice service.
    #[must_use]
    pub fn new(
        notices: Arc<dyn NoticeRepository>,
        drafter: Arc<dyn NoticeDraftGenerator>,
    ) -> Self {
        Self { notices, drafter }
    }

    /// Creates a notice in the author's school.
    pub async fn create_notice(
        &self,
        actor: &RoleClaims,
        input: CreateNoticeInput,
    ) -> AppResult<Notice> {
        actor.require_role(&[UserRole::Admin, UserRole::Teacher])?;
        let school_id = actor.require_school()?;

        let notice = Notice::new(NoticeParts {
            id: NoticeId::generate(),
            school_id,
            title: input.title,
            content: input.content,
            audience: input.audience,
            class_details: input.class_details,
            published: input.published,
            created_at: Utc::now(),
        })?;
        self.notices.create_notice(notice.clone()).await?;
        info!(
            %school_id,
            notice_id = %notice.id(),
            audience = notice.audience().as_str(),
            "notice created"
        );

        Ok(notice)
    }

    /// Lists the notices the caller may read, newest first.
    pub async fn list_notices(&self, actor: &RoleClaims) -> AppResult<Vec<Notice>> {
        actor.require_role(&[UserRole::Admin, UserRole::Teacher, UserRole::Student])?;
        let school_id = actor.require_school()?;

        let mut notices: Vec<Notice> = self
            .notices
            .list_notices(school_id)
            .await?
            .into_iter()
            .filter(|notice| notice.is_visible_to(actor.role()))
            .collect();
        notices.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(notices)
    }

    /// Publishes or withdraws a notice.
    pub async fn set_notice_published(
        &self,
        actor: &RoleClaims,
        notice_id: &NoticeId,
        published: bool,
    ) -> AppResult<Notice> {
        actor.require_role(&[UserRole::Admin])?;
        let school_id = actor.require_school()?;

        let mut notice = self
            .notices
            .find_notice(school_id, notice_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("notice '{notice_id}' does not exist")))?;
        notice.set_published(published);
        self.notices.save_notice(notice.clone()).await?;
        info!(%school_id, %notice_id, published, "notice publication changed");

        Ok(notice)
    }

    /// Drafts notice content through the configured generator.
    pub async fn draft_notice_content(
        &self,
        actor: &RoleClaims,
        request: NoticeDraftRequest,
    ) -> AppResult<String> {
        actor.require_role(&[UserRole::Admin, UserRole::Teacher])?;
        if request.title.trim().is_empty() {
            return Err(AppError::Validation(
                "a title is required to draft content".to_owned(),
            ));
        }

        match self.drafter.generate(&request).await {
            Ok(content) if !content.trim().is_empty() => Ok(content.trim().to_owned()),
            Ok(_) => {
                warn!("notice drafter returned empty content");
                Err(AppError::Internal(DRAFT_FAILED_MESSAGE.to_owned()))
            }
            Err(error) => {
                warn!(%error, "notice drafting failed");
                Err(AppError::Internal(DRAFT_FAILED_MESSAGE.to_owned()))
            }
        }
    }
}
