use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_token, Session};
use crate::database::scope::ACTIVE;
use crate::database::Lookup;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the session for every protected route.
///
/// In production a missing or invalid bearer token stops the request with
/// `401`. In development the request continues as a guest. Either way a
/// token that resolves to a user without an auth key is `403`.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = match authenticate(&state, request.headers()).await {
        Ok(session) => session,
        Err(err @ ApiError::Unauthorized(_)) if state.config.is_development() => {
            tracing::debug!("Continuing as guest: {}", err);
            Session::guest()
        }
        Err(err) => {
            tracing::warn!("Authentication failed: {}", err);
            return Err(err);
        }
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(&state.config.security, &token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = state.users.find(&Lookup::key(claims.sub), ACTIVE).await?;
    match user {
        Some(user) if user.is_authorized() => Ok(Session::for_user(&user)),
        _ => Err(ApiError::forbidden("You don't have permission to access.")),
    }
}

/// Extract the token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("auth header is empty"))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid auth header"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::unauthorized("invalid auth header")),
    }
}
