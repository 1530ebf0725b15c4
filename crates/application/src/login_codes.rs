//! Random sign-in codes for schools, students and teachers.

use schooldesk_core::{AppError, AppResult};
use schooldesk_domain::{LOGIN_CODE_LENGTH, LoginCode, LoginCodeKind};

/// Largest multiple of 36 not above 256. Bytes at or above it are redrawn so
/// every base-36 character is equally likely.
const UNBIASED_BYTE_LIMIT: u8 = 252;

const MAX_CODE_ATTEMPTS: usize = 8;

/// Generates a random login code such as `SCH-4KD9QZ`.
pub fn generate_login_code(kind: LoginCodeKind) -> AppResult<LoginCode> {
    let mut suffix = [0u8; LOGIN_CODE_LENGTH];
    let mut filled = 0;
    let mut pool = [0u8; 16];

    while filled < LOGIN_CODE_LENGTH {
        getrandom::fill(&mut pool).map_err(|error| {
            AppError::Internal(format!("failed to generate login code: {error}"))
        })?;
        for byte in pool.into_iter().filter(|byte| *byte < UNBIASED_BYTE_LIMIT) {
            if filled == LOGIN_CODE_LENGTH {
                break;
            }
            suffix[filled] = byte;
            filled += 1;
        }
    }

    Ok(LoginCode::from_random_bytes(kind, suffix))
}

/// Generates a login code that `is_taken` does not report as already in use.
pub fn generate_unique_login_code(
    kind: LoginCodeKind,
    is_taken: impl Fn(&LoginCode) -> bool,
) -> AppResult<LoginCode> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_login_code(kind)?;
        if !is_taken(&code) {
            return Ok(code);
        }
    }

    Err(AppError::Conflict(
        "could not allocate a free login code, please try again".to_owned(),
    ))
}
