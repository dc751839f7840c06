use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::Session;
use crate::constraints::GuardContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Runs the registered route constraints against the session resolved by
/// the auth layer and stops the request on the first denial.
pub async fn constraints_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = GuardContext {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        session: request.extensions().get::<Session>().cloned().unwrap_or_default(),
    };

    if !state.constraints.permits(&ctx) {
        tracing::warn!("Constraint denied {} {} for {:?}", ctx.method, ctx.path, ctx.session.user);
        return Err(ApiError::forbidden("Permission denied."));
    }

    Ok(next.run(request).await)
}
