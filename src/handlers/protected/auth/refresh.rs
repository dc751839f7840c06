// handlers/protected/auth/refresh.rs - GET /v1/auth/refresh handler

use axum::{extract::State, http::HeaderMap};

use crate::auth::{decode_unexpired, refresh_token, IssuedToken};
use crate::error::ApiError;
use crate::middleware::{bearer_token, ApiResponse, ApiResult};
use crate::state::AppState;

/// Re-issue the caller's token while its refresh window is open. Expiry of
/// the old token is only ignored in development mode; in production the
/// session layer has already rejected an expired token with `401`.
pub async fn refresh_get(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<IssuedToken> {
    let token = bearer_token(&headers)?;
    let claims = decode_unexpired(&state.config.security, &token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    let issued = refresh_token(&state.config.security, &claims)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;
    Ok(ApiResponse::success(issued))
}
