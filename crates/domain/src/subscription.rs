//! School subscription terms and seat limits.

use chrono::{DateTime, Utc};
use schooldesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Seat category counted against a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    /// Enrolled student.
    Student,
    /// Employed teacher.
    Teacher,
}

impl SeatKind {
    /// Returns the stable storage value for this seat kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

/// Subscription terms embedded in a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    max_students: u32,
    max_teachers: u32,
    expiry: DateTime<Utc>,
}

impl Subscription {
    /// Creates subscription terms. Both seat limits must be at least one.
    pub fn new(max_students: u32, max_teachers: u32, expiry: DateTime<Utc>) -> AppResult<Self> {
        if max_students < 1 {
            return Err(AppError::Validation(
                "max students must be at least 1".to_owned(),
            ));
        }
        if max_teachers < 1 {
            return Err(AppError::Validation(
                "max teachers must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            max_students,
            max_teachers,
            expiry,
        })
    }

    /// Returns the student seat limit.
    #[must_use]
    pub fn max_students(&self) -> u32 {
        self.max_students
    }

    /// Returns the teacher seat limit.
    #[must_use]
    pub fn max_teachers(&self) -> u32 {
        self.max_teachers
    }

    /// Returns the expiry instant.
    #[must_use]
    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns the seat limit for a seat kind.
    #[must_use]
    pub fn limit_for(&self, kind: SeatKind) -> u32 {
        match kind {
            SeatKind::Student => self.max_students,
            SeatKind::Teacher => self.max_teachers,
        }
    }

    /// Returns whether the subscription is active at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        is_subscription_active(self.expiry, now)
    }
}

/// Returns whether a subscription expiring at `expiry` is active at `now`.
///
/// The expiry instant itself already counts as expired.
#[must_use]
pub fn is_subscription_active(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < expiry
}

/// Whole days from `now` until `expiry`, truncated toward zero.
///
/// Negative once the subscription has lapsed by a full day or more.
#[must_use]
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_days()
}

/// Outcome of a seat limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatCheck {
    /// One more seat may be taken.
    Available,
    /// Every seat is taken.
    LimitReached {
        /// Seats in use.
        current: u64,
        /// Seat limit.
        max: u64,
    },
}

impl SeatCheck {
    /// Returns whether the check allows one more seat.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Checks whether one more seat fits under `max_allowed`.
#[must_use]
pub fn check_seat_limit(current_count: u64, max_allowed: u64) -> SeatCheck {
    if current_count >= max_allowed {
        return SeatCheck::LimitReached {
            current: current_count,
            max: max_allowed,
        };
    }

    SeatCheck::Available
}
