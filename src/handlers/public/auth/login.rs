// handlers/public/auth/login.rs - POST /v1/auth handler

use axum::extract::State;
use serde::Deserialize;

use crate::auth::{issue_token, verify_password, IssuedToken};
use crate::database::scope::ACTIVE;
use crate::database::Lookup;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Payload};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Incorrect Username / Password";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/**
 * POST /v1/auth - Exchange email and password for a bearer token
 *
 * Expected Input:
 * ```json
 * { "username": "ada@example.com", "password": "secret1" }
 * ```
 * (`email` is accepted in place of `username`)
 *
 * Expected Output (Success):
 * ```json
 * { "token": "eyJhbGciOiJIUzI1NiI...", "expire": "2024-01-01T12:00:00Z" }
 * ```
 */
pub async fn login_post(
    State(state): State<AppState>,
    Payload(credentials): Payload<LoginRequest>,
) -> ApiResult<IssuedToken> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::bad_request("Missing Username or Password"));
    }

    let user = state
        .users
        .find(&Lookup::key(credentials.username.as_str()), ACTIVE)
        .await?;

    let Some(user) = user else {
        tracing::warn!("Login failed: unknown user {}", credentials.username);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(credentials.password, user.password.clone()).await {
        tracing::warn!("Login failed: wrong password for User#{}", user.uuid);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let issued = issue_token(&state.config.security, &state.config.app_name, &user.email, user.id)?;
    tracing::info!("User#{} logged in", user.uuid);
    Ok(ApiResponse::success(issued))
}
