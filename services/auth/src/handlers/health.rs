use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Handler for `GET /readyz` — readiness check, pings the database.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
