// ============================================================================
// Contable API - Auth Handlers
// File: crates/contable-api/src/handlers/auth.rs
// ============================================================================
//! Token issuing

use axum::{extract::State, Json};
use validator::Validate;

use contable_shared::constants::TOKEN_TYPE_BEARER;

use crate::dto::{LoginRequest, TokenResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Login handler - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let result = state.auth.login(&payload.username, &payload.password).await?;

    Ok(Json(TokenResponse {
        access_token: result.access_token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: result.expires_in,
    }))
}
