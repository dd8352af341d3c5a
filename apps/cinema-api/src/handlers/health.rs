//! Liveness and readiness checks.

use axum::extract::State;

use crate::error::ApiError;
use crate::AppState;

/// `GET /health`: the process is up.
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /ready`: the database answers queries.
pub async fn ready(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if state.db.health_check().await {
        Ok("ready")
    } else {
        Err(ApiError::unavailable("Database is not reachable"))
    }
}
