// handlers/mod.rs - Two handler tiers
//
// Public (no session)  → /v1/auth, /health
// Protected (session + route constraints) → /v1/auth/refresh, /v1/{users,categories,statements}

pub mod protected;
pub mod public;


use crate::error::ApiError;

/// Fallback for every unknown route
pub async fn missing_route() -> ApiError {
    ApiError::not_found("Route not found.")
}
