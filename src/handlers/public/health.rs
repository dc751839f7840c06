// handlers/public/health.rs - GET /health handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Liveness plus a database round trip; `503` when the database is unreachable
pub async fn health_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.users.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable(format!("Database unavailable: {}", e))
    })?;

    Ok(Json(json!({ "status": "ok", "timestamp": chrono::Utc::now(), "database": "ok" })))
}
