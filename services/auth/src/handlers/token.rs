use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use uuid::Uuid;

use handin_auth_types::cookie::{HANDIN_SESSION_TOKEN, clear_session_cookie, set_session_cookie};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::cleanup::CleanupUseCase;
use crate::usecase::token::{
    AuthenticateUseCase, LogoutUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

#[derive(Serialize)]
pub struct IdentityResponse {
    pub student_id: Uuid,
    pub email: String,
}

// ── POST /auth/token ──────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyCodeUseCase {
        students: state.student_repo(),
        auth_codes: state.auth_code_repo(),
        sessions: state.session_repo(),
        jwt_secret: state.config.jwt_secret.clone(),
        token_ttl_secs: state.config.token_ttl_secs,
        otp_ttl_minutes: state.config.otp_ttl_minutes,
    };

    let out = usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.code,
        })
        .await?;

    let jar = set_session_cookie(
        jar,
        out.session_token,
        state.config.cookie_domain.clone(),
        state.config.cookie_max_age_secs(),
    );
    let body = IdentityResponse {
        student_id: out.student.id,
        email: out.student.email,
    };

    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ── GET /auth/token ───────────────────────────────────────────────────────────

pub async fn check_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let token_value = jar
        .get(HANDIN_SESSION_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::Unauthenticated)?;

    let usecase = AuthenticateUseCase {
        students: state.student_repo(),
        sessions: state.session_repo(),
        jwt_secret: state.config.jwt_secret.clone(),
        session_max_age_days: state.config.session_max_age_days,
    };
    let student = usecase.execute(&token_value).await?;

    Ok((
        StatusCode::OK,
        Json(IdentityResponse {
            student_id: student.id,
            email: student.email,
        }),
    ))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

/// Logout never fails from the caller's perspective: the session revocation is
/// best-effort, the cleanup pass is fire-and-forget, and the cookie is cleared
/// unconditionally.
pub async fn revoke_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let token_value = jar.get(HANDIN_SESSION_TOKEN).map(|c| c.value().to_owned());

    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
        jwt_secret: state.config.jwt_secret.clone(),
    };
    usecase.execute(token_value.as_deref()).await;

    spawn_lazy_cleanup(&state);

    let jar = clear_session_cookie(jar, state.config.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}

/// Opportunistic cleanup after logout. The result is dropped; errors are only
/// logged and never reach the logout response.
fn spawn_lazy_cleanup(state: &AppState) {
    let cleanup = CleanupUseCase {
        sessions: state.session_repo(),
        auth_codes: state.auth_code_repo(),
        session_max_age_days: state.config.session_max_age_days,
        code_retention_hours: state.config.code_retention_hours,
    };
    tokio::spawn(async move {
        match cleanup.execute().await {
            Ok(out) => tracing::debug!(
                sessions_deleted = out.sessions_deleted,
                auth_codes_deleted = out.auth_codes_deleted,
                "lazy cleanup finished"
            ),
            Err(e) => tracing::warn!(error = %e, "lazy cleanup failed"),
        }
    });
}
