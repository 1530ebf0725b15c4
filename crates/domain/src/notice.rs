//! School notices and their audiences.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use schooldesk_core::{AppError, AppResult, NonEmptyString, TenantId, UserRole};
use serde::{Deserialize, Serialize};

use crate::identifiers::NoticeId;
use crate::roster::SchoolClass;

/// Minimum characters in a notice title.
pub const NOTICE_TITLE_MIN_LENGTH: usize = 5;

/// Minimum characters in a notice body.
pub const NOTICE_CONTENT_MIN_LENGTH: usize = 20;

/// Readers a notice is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeAudience {
    /// Everyone in the school.
    All,
    /// Teachers only.
    Teacher,
    /// Students only.
    Student,
    /// Students of one class.
    Class,
}

impl NoticeAudience {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Class => "class",
        }
    }

    /// Returns whether students are among the addressed readers.
    #[must_use]
    pub fn reaches_students(&self) -> bool {
        matches!(self, Self::All | Self::Student | Self::Class)
    }
}

impl FromStr for NoticeAudience {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            "class" => Ok(Self::Class),
            _ => Err(AppError::Validation(format!(
                "unknown notice audience '{value}'"
            ))),
        }
    }
}

/// Notice posted to a school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    id: NoticeId,
    school_id: TenantId,
    title: NonEmptyString,
    content: NonEmptyString,
    audience: NoticeAudience,
    class_details: Option<SchoolClass>,
    published: bool,
    created_at: DateTime<Utc>,
}

/// Fields of a notice as written or stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeParts {
    /// Notice id.
    pub id: NoticeId,
    /// Owning school.
    pub school_id: TenantId,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Addressed readers.
    pub audience: NoticeAudience,
    /// Target class, required for class notices.
    pub class_details: Option<String>,
    /// Publication flag.
    pub published: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Notice {
    /// Creates a validated notice.
    pub fn new(parts: NoticeParts) -> AppResult<Self> {
        let title =
            NonEmptyString::with_min_length("notice title", parts.title, NOTICE_TITLE_MIN_LENGTH)?;
        let content = NonEmptyString::with_min_length(
            "notice content",
            parts.content,
            NOTICE_CONTENT_MIN_LENGTH,
        )?;

        let class_details = match parts.audience {
            NoticeAudience::Class => {
                let class = parts.class_details.as_deref().ok_or_else(|| {
                    AppError::Validation("class notices must name a class".to_owned())
                })?;
                Some(SchoolClass::parse(class)?)
            }
            NoticeAudience::All | NoticeAudience::Teacher | NoticeAudience::Student => None,
        };

        Ok(Self {
            id: parts.id,
            school_id: parts.school_id,
            title,
            content,
            audience: parts.audience,
            class_details,
            published: parts.published,
            created_at: parts.created_at,
        })
    }

    /// Returns the notice id.
    #[must_use]
    pub fn id(&self) -> &NoticeId {
        &self.id
    }

    /// Returns the owning school.
    #[must_use]
    pub fn school_id(&self) -> TenantId {
        self.school_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the body text.
    #[must_use]
    pub fn content(&self) -> &NonEmptyString {
        &self.content
    }

    /// Returns the addressed readers.
    #[must_use]
    pub fn audience(&self) -> NoticeAudience {
        self.audience
    }

    /// Returns the target class of a class notice.
    #[must_use]
    pub fn class_details(&self) -> Option<&SchoolClass> {
        self.class_details.as_ref()
    }

    /// Returns whether the notice is published.
    #[must_use]
    pub fn published(&self) -> bool {
        self.published
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sets the publication flag.
    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Returns whether a reader with `role` sees this notice in listings.
    ///
    /// Staff see every notice, drafts included. Students only see published
    /// notices addressed to them.
    #[must_use]
    pub fn is_visible_to(&self, role: UserRole) -> bool {
        match role {
            UserRole::Admin | UserRole::Teacher => true,
            UserRole::Student => self.published && self.audience.reaches_students(),
            UserRole::Master => false,
        }
    }
}
