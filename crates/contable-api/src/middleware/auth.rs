//! Bearer-token gate for protected routes

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use contable_shared::constants::TOKEN_TYPE_BEARER;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects the request with 401 unless it carries a valid bearer token.
/// On success the decoded [`contable_security::Claims`] are placed in the
/// request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = state
        .jwt
        .validate_token(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    debug!("Bearer token accepted for user {}", claims.sub);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case(TOKEN_TYPE_BEARER) && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized(
            "Authorization scheme must be Bearer".to_string(),
        )),
    }
}
