//! HS256 JWT session token codec.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use schooldesk_application::{IdentityTokenIssuer, IdentityTokenVerifier};
use schooldesk_core::{AppError, AppResult, RoleClaims, TenantId, UserRole};
use serde::{Deserialize, Serialize};

/// Minimum accepted length of the signing secret.
pub const MIN_SECRET_LENGTH: usize = 32;

fn default_role() -> String {
    UserRole::Student.as_str().to_owned()
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default = "default_role")]
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    school_id: Option<String>,
    #[serde(default)]
    subscription_active: bool,
    exp: i64,
    iat: i64,
}

/// HS256 session token codec.
///
/// Tokens without a role claim are read as student sessions, and tokens
/// without a subscription flag as inactive ones.
#[derive(Clone)]
pub struct JwtIdentityCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl JwtIdentityCodec {
    /// Creates a codec signing with `secret`.
    pub fn new(secret: &str, token_ttl: Duration) -> AppResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} characters"
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        })
    }
}

impl IdentityTokenVerifier for JwtIdentityCodec {
    fn verify(&self, token: &str) -> AppResult<RoleClaims> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("missing session token".to_owned()));
        }

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|error| AppError::Unauthorized(format!("invalid session token: {error}")))?
            .claims;

        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::Unauthorized(format!("unknown role '{}'", claims.role)))?;
        let school_id = claims
            .school_id
            .as_deref()
            .map(str::parse::<TenantId>)
            .transpose()
            .map_err(|_| AppError::Unauthorized("invalid school claim".to_owned()))?;

        Ok(RoleClaims::new(
            claims.sub,
            role,
            school_id,
            claims.subscription_active,
        ))
    }
}

impl IdentityTokenIssuer for JwtIdentityCodec {
    fn issue(&self, claims: &RoleClaims) -> AppResult<String> {
        let now = Utc::now();
        let session = SessionClaims {
            sub: claims.subject().to_owned(),
            role: claims.role().as_str().to_owned(),
            school_id: claims.school_id().map(|school_id| school_id.to_string()),
            subscription_active: claims.subscription_active(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &session, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign session token: {error}")))
    }
}
