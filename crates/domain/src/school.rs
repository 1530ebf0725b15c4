use std::str::FromStr;

use chrono::{DateTime, Utc};
use schooldesk_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};

use crate::identifiers::LoginCode;
use crate::subscription::Subscription;

/// Minimum characters in a school name.
pub const SCHOOL_NAME_MIN_LENGTH: usize = 3;

/// Operating status of a school tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolStatus {
    /// School may be used.
    Active,
    /// School was switched off by the platform owner.
    Disabled,
}

impl SchoolStatus {
    /// Returns the stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }
}

impl FromStr for SchoolStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            _ => Err(AppError::Validation(format!(
                "unknown school status '{value}'"
            ))),
        }
    }
}

/// School tenant with its subscription terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct School {
    id: TenantId,
    name: NonEmptyString,
    address: Option<String>,
    code: LoginCode,
    status: SchoolStatus,
    subscription: Subscription,
    created_at: DateTime<Utc>,
}

impl School {
    /// Creates a validated school.
    pub fn new(
        id: TenantId,
        name: impl Into<String>,
        address: Option<String>,
        code: LoginCode,
        status: SchoolStatus,
        subscription: Subscription,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::with_min_length("school name", name, SCHOOL_NAME_MIN_LENGTH)?;
        let address = address
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            id,
            name,
            address,
            code,
            status,
            subscription,
            created_at,
        })
    }

    /// Returns the tenant id.
    #[must_use]
    pub fn id(&self) -> TenantId {
        self.id
    }

    /// Returns the school name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the postal address, if recorded.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the school login code.
    #[must_use]
    pub fn code(&self) -> &LoginCode {
        &self.code
    }

    /// Returns the operating status.
    #[must_use]
    pub fn status(&self) -> SchoolStatus {
        self.status
    }

    /// Returns the subscription terms.
    #[must_use]
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether rosters may change at `now`.
    #[must_use]
    pub fn accepts_enrolment_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SchoolStatus::Active && self.subscription.is_active_at(now)
    }

    /// Replaces the subscription terms.
    pub fn set_subscription(&mut self, subscription: Subscription) {
        self.subscription = subscription;
    }

    /// Changes the operating status.
    pub fn set_status(&mut self, status: SchoolStatus) {
        self.status = status;
    }
}
