use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::cleanup::CleanupUseCase;

#[derive(Serialize)]
pub struct CleanupResponse {
    pub sessions_deleted: u64,
    pub auth_codes_deleted: u64,
    #[serde(serialize_with = "handin_core::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
}

/// Scheduled cleanup entry point, invoked by an external cron. Returns the
/// deletion counts for observability; a store failure surfaces as 503 here
/// (unlike the lazy post-logout pass, which swallows it).
pub async fn run_cleanup(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CleanupUseCase {
        sessions: state.session_repo(),
        auth_codes: state.auth_code_repo(),
        session_max_age_days: state.config.session_max_age_days,
        code_retention_hours: state.config.code_retention_hours,
    };
    let out = usecase.execute().await?;

    tracing::info!(
        sessions_deleted = out.sessions_deleted,
        auth_codes_deleted = out.auth_codes_deleted,
        "scheduled cleanup finished"
    );

    Ok(Json(CleanupResponse {
        sessions_deleted: out.sessions_deleted,
        auth_codes_deleted: out.auth_codes_deleted,
        timestamp: Utc::now(),
    }))
}
