//! Shared primitives for all SchoolDesk crates.

#![forbid(unsafe_code)]

/// Role claims attached to authenticated sessions.
pub mod auth;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::{RoleClaims, UserRole};

/// Result type used across SchoolDesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string. Surrounding whitespace is trimmed.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a validated string with at least `min_chars` characters.
    pub fn with_min_length(
        field: &str,
        value: impl Into<String>,
        min_chars: usize,
    ) -> AppResult<Self> {
        let value = Self::new(value)
            .map_err(|_| AppError::Validation(format!("{field} must not be empty")))?;
        if value.0.chars().count() < min_chars {
            return Err(AppError::Validation(format!(
                "{field} must be at least {min_chars} characters"
            )));
        }

        Ok(value)
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Tenant (school) identifier used as the partition key for every persisted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a random tenant identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a tenant identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TenantId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid school id '{value}': {error}")))
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by the access policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error, usually an unavailable collaborator.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{NonEmptyString, TenantId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_trims_input() {
        let value = NonEmptyString::new("  Class 9 ");
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            "Class 9".to_owned()
        );
    }

    #[test]
    fn min_length_counts_characters() {
        assert!(NonEmptyString::with_min_length("name", "Al", 3).is_err());
        assert!(NonEmptyString::with_min_length("name", "Ali", 3).is_ok());
    }

    #[test]
    fn tenant_id_roundtrips_through_display() {
        let tenant_id = TenantId::new();
        let parsed = tenant_id.to_string().parse::<TenantId>();
        assert_eq!(parsed.ok(), Some(tenant_id));
    }

    #[test]
    fn malformed_tenant_id_is_rejected() {
        assert!("school-1".parse::<TenantId>().is_err());
    }
}
