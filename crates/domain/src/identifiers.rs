//! Record identifiers and login codes.

use std::fmt::{Display, Formatter};

use schooldesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier.
            pub fn new(value: impl Into<String>) -> AppResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(AppError::Validation(concat!($label, " must not be empty").to_owned()));
                }

                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                formatter.write_str(self.0.as_str())
            }
        }
    };
}

record_id!(
    /// Student identifier. Equals the subject claim of the student's session.
    StudentId,
    "student id"
);
record_id!(
    /// Teacher identifier.
    TeacherId,
    "teacher id"
);
record_id!(
    /// Exam result identifier.
    ResultId,
    "result id"
);
record_id!(
    /// Payment identifier.
    PaymentId,
    "payment id"
);
record_id!(
    /// Notice identifier.
    NoticeId,
    "notice id"
);

/// Number of random characters after the login code prefix.
pub const LOGIN_CODE_LENGTH: usize = 6;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Kind of account a login code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginCodeKind {
    /// School sign-in code.
    School,
    /// Student sign-in code.
    Student,
    /// Teacher sign-in code.
    Teacher,
}

impl LoginCodeKind {
    /// Returns the code prefix, without the separator.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::School => "SCH",
            Self::Student => "STU",
            Self::Teacher => "TCH",
        }
    }
}

/// Human-enterable login code such as `STU-7K2Q9A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginCode(String);

impl LoginCode {
    /// Builds a code from random bytes, one base-36 character per byte.
    #[must_use]
    pub fn from_random_bytes(kind: LoginCodeKind, bytes: [u8; LOGIN_CODE_LENGTH]) -> Self {
        let suffix: String = bytes
            .iter()
            .map(|byte| char::from(BASE36[usize::from(*byte) % BASE36.len()]))
            .collect();

        Self(format!("{}-{suffix}", kind.prefix()))
    }

    /// Parses a stored code, checking its prefix and suffix alphabet.
    pub fn parse(kind: LoginCodeKind, value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let suffix = value
            .strip_prefix(kind.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "login code '{value}' must start with '{}-'",
                    kind.prefix()
                ))
            })?;

        let valid_suffix = suffix.len() == LOGIN_CODE_LENGTH
            && suffix
                .bytes()
                .all(|byte| byte.is_ascii_digit() || byte.is_ascii_uppercase());
        if !valid_suffix {
            return Err(AppError::Validation(format!(
                "login code '{value}' must end with {LOGIN_CODE_LENGTH} uppercase letters or digits"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for LoginCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{LoginCode, LoginCodeKind, StudentId};

    #[test]
    fn login_code_maps_bytes_to_base36() {
        let code = LoginCode::from_random_bytes(LoginCodeKind::Student, [0, 9, 10, 35, 36, 255]);
        assert_eq!(code.as_str(), "STU-09AZ03");
    }

    #[test]
    fn generated_codes_parse_back() {
        let code = LoginCode::from_random_bytes(LoginCodeKind::Teacher, [1, 2, 3, 4, 5, 6]);
        assert!(LoginCode::parse(LoginCodeKind::Teacher, code.as_str()).is_ok());
        assert!(LoginCode::parse(LoginCodeKind::School, code.as_str()).is_err());
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(LoginCode::parse(LoginCodeKind::School, "SCH-abc123").is_err());
        assert!(LoginCode::parse(LoginCodeKind::School, "SCH-ABC12").is_err());
        assert!(LoginCode::parse(LoginCodeKind::School, "SCHABC123").is_err());
    }

    #[test]
    fn record_ids_reject_blank_values() {
        assert!(StudentId::new("  ").is_err());
        assert_eq!(
            StudentId::new(" uid-1 ").map(|id| id.to_string()).ok(),
            Some("uid-1".to_owned())
        );
    }
}
