//! Session token ports.

use schooldesk_core::{AppResult, RoleClaims};

/// Port verifying bearer tokens into role claims.
pub trait IdentityTokenVerifier: Send + Sync {
    /// Verifies a token and returns the claims it carries.
    ///
    /// Expired, malformed or forged tokens fail with `AppError::Unauthorized`.
    fn verify(&self, token: &str) -> AppResult<RoleClaims>;
}

/// Port signing role claims into bearer tokens.
pub trait IdentityTokenIssuer: Send + Sync {
    /// Issues a signed token carrying `claims`.
    fn issue(&self, claims: &RoleClaims) -> AppResult<String>;
}
