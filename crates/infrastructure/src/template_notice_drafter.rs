//! Offline notice drafter. Fills a fixed template instead of calling a model.

use async_trait::async_trait;
use schooldesk_application::{NoticeDraftGenerator, NoticeDraftRequest};
use schooldesk_core::AppResult;
use schooldesk_domain::NoticeAudience;
use tracing::info;

/// Development drafter producing template text.
#[derive(Clone)]
pub struct TemplateNoticeDrafter;

impl TemplateNoticeDrafter {
    /// Creates a new template drafter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TemplateNoticeDrafter {
    fn default() -> Self {
        Self::new()
    }
}

fn salutation(request: &NoticeDraftRequest) -> String {
    match (request.audience, request.class_details.as_deref()) {
        (NoticeAudience::All, _) => "Dear all".to_owned(),
        (NoticeAudience::Teacher, _) => "Dear teachers".to_owned(),
        (NoticeAudience::Student, _) => "Dear students".to_owned(),
        (NoticeAudience::Class, Some(class)) => format!("Dear students of {class}"),
        (NoticeAudience::Class, None) => "Dear students".to_owned(),
    }
}

#[async_trait]
impl NoticeDraftGenerator for TemplateNoticeDrafter {
    async fn generate(&self, request: &NoticeDraftRequest) -> AppResult<String> {
        let title = request.title.trim();
        let content = format!(
            "{},\n\nThis notice is about \"{title}\". Please read it carefully and contact \
             the school office if anything is unclear.\n\nThank you.",
            salutation(request)
        );
        info!(
            audience = request.audience.as_str(),
            title, "drafted notice content from template"
        );

        Ok(content)
    }
}
