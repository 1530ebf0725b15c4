use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, TenantId};

/// Dashboard role carried in identity claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform owner managing every school.
    Master,
    /// School administrator.
    Admin,
    /// Teacher inside one school.
    Teacher,
    /// Student inside one school.
    Student,
}

impl UserRole {
    /// Returns the stable claim value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[UserRole] = &[
            UserRole::Master,
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Student,
        ];

        ALL
    }
}

impl Display for UserRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "master" => Ok(Self::Master),
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Claims issued by the identity provider for one authenticated session.
///
/// Claims are fixed for the lifetime of the token they came from and are
/// passed explicitly into every policy decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaims {
    subject: String,
    role: UserRole,
    school_id: Option<TenantId>,
    subscription_active: bool,
}

impl RoleClaims {
    /// Creates role claims from verified token data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        role: UserRole,
        school_id: Option<TenantId>,
        subscription_active: bool,
    ) -> Self {
        Self {
            subject: subject.into(),
            role,
            school_id,
            subscription_active,
        }
    }

    /// Returns the stable subject claim. For students this is the student id.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the claimed role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Returns the school the session is scoped to, if any.
    #[must_use]
    pub fn school_id(&self) -> Option<TenantId> {
        self.school_id
    }

    /// Returns the subscription flag captured when the token was issued.
    #[must_use]
    pub fn subscription_active(&self) -> bool {
        self.subscription_active
    }

    /// Returns the school scope or rejects sessions that carry none.
    pub fn require_school(&self) -> AppResult<TenantId> {
        self.school_id.ok_or_else(|| {
            AppError::Forbidden(format!(
                "subject '{}' is not bound to a school",
                self.subject
            ))
        })
    }

    /// Rejects the session unless its role is one of `allowed`.
    pub fn require_role(&self, allowed: &[UserRole]) -> AppResult<()> {
        if allowed.contains(&self.role) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "role '{}' may not perform this action",
            self.role
        )))
    }
}
