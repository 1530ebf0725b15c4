use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use schooldesk_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

const API_PREFIX: &str = "/api";

/// Verifies the bearer token and checks the resource path against the access table.
///
/// Authorized requests carry their `RoleClaims` as a request extension.
pub async fn require_access(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let claims = bearer_token(request.headers())?
        .map(|token| state.token_verifier.verify(token))
        .transpose()?;

    let resource_path = resource_path(request.uri().path());
    state
        .access_service
        .authorize(claims.as_ref(), resource_path)?;

    if let Some(claims) = claims {
        request.extensions_mut().insert(claims);
    }
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> ApiResult<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| {
        AppError::Unauthorized("authorization header is not valid text".to_owned())
    })?;
    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("authorization header must use the Bearer scheme".to_owned())
    })?;

    Ok(Some(token))
}

/// Maps `/api/<path>` to the page path `/<path>` the access table is written against.
pub fn resource_path(request_path: &str) -> &str {
    match request_path.strip_prefix(API_PREFIX) {
        Some(rest) if rest.starts_with('/') => rest,
        _ => request_path,
    }
}
