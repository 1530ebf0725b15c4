//! Generative notice drafting port.

use async_trait::async_trait;

use schooldesk_core::AppResult;
use schooldesk_domain::NoticeAudience;

/// Prompt inputs for drafting the body of a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDraftRequest {
    /// Notice title.
    pub title: String,
    /// Addressed readers.
    pub audience: NoticeAudience,
    /// Class details when the notice targets one class.
    pub class_details: Option<String>,
}

/// Port for generative notice drafting.
#[async_trait]
pub trait NoticeDraftGenerator: Send + Sync {
    /// Returns draft body text for the notice.
    async fn generate(&self, request: &NoticeDraftRequest) -> AppResult<String>;
}
