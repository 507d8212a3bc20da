use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use handin_core::health::healthz;
use handin_core::middleware::request_id_layer;

use crate::handlers::{
    auth_code::request_code,
    cleanup::run_cleanup,
    health::readyz,
    token::{check_token, create_token, revoke_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login code
        .route("/auth/code", post(request_code))
        // Session token
        .route("/auth/token", get(check_token))
        .route("/auth/token", post(create_token))
        .route("/auth/token", delete(revoke_token))
        // Scheduled cleanup (external cron)
        .route("/auth/cleanup", post(run_cleanup))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
