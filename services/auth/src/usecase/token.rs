use chrono::{Duration, Utc};
use uuid::Uuid;

use handin_auth_types::token::{issue_session_token, validate_session_token};

use crate::domain::repository::{AuthCodeRepository, SessionRepository, StudentRepository};
use crate::domain::types::{OTP_LOOKBACK_MINUTES, Session, Student};
use crate::error::AuthServiceError;

// ── VerifyCode (login) ───────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub student: Student,
    pub session_token: String,
    pub session_token_exp: u64,
}

/// Exchange a login code for a session and a signed session token.
pub struct VerifyCodeUseCase<S, A, E>
where
    S: StudentRepository,
    A: AuthCodeRepository,
    E: SessionRepository,
{
    pub students: S,
    pub auth_codes: A,
    pub sessions: E,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub otp_ttl_minutes: i64,
}

impl<S, A, E> VerifyCodeUseCase<S, A, E>
where
    S: StudentRepository,
    A: AuthCodeRepository,
    E: SessionRepository,
{
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, AuthServiceError> {
        let student = self
            .students
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UnknownEmail)?;

        let now = Utc::now();

        // Only the most recent unused code matching the submitted value counts;
        // older rows with coincidentally identical digits stay out of play.
        // The lookback bounds the query, the TTL below is the actual expiry.
        let lookback = now - Duration::minutes(OTP_LOOKBACK_MINUTES);
        let code = self
            .auth_codes
            .find_latest_matching(student.id, &input.code, lookback)
            .await?
            .ok_or(AuthServiceError::InvalidCode)?;

        let expires_at = code.expires_at(Duration::minutes(self.otp_ttl_minutes));
        if now >= expires_at {
            // Burn the stale code so it cannot be retried; later attempts get
            // InvalidCode rather than flip-flopping back to ExpiredCode.
            self.auth_codes.mark_used(code.id).await?;
            let overage_minutes = (now - expires_at).num_minutes();
            return Err(AuthServiceError::ExpiredCode { overage_minutes });
        }

        self.auth_codes.mark_used(code.id).await?;

        let session = Session {
            id: Uuid::new_v4(),
            student_id: student.id,
            created_at: now,
            revoked: false,
        };
        self.sessions.create(&session).await?;

        let (session_token, session_token_exp) =
            issue_session_token(session.id, &self.jwt_secret, self.token_ttl_secs)
                .map_err(|e| AuthServiceError::Internal(e.into()))?;

        Ok(VerifyCodeOutput {
            student,
            session_token,
            session_token_exp,
        })
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve a bearer token to the student it authenticates.
///
/// Two independent layers: the stateless token check (signature + expiry, no
/// store round-trip) and the stateful session check (exists, unrevoked, within
/// max age). The second layer is what makes logout effective before the token
/// itself expires. Every failure collapses into `Unauthenticated`.
pub struct AuthenticateUseCase<S, E>
where
    S: StudentRepository,
    E: SessionRepository,
{
    pub students: S,
    pub sessions: E,
    pub jwt_secret: String,
    pub session_max_age_days: i64,
}

impl<S, E> AuthenticateUseCase<S, E>
where
    S: StudentRepository,
    E: SessionRepository,
{
    pub async fn execute(&self, token: &str) -> Result<Student, AuthServiceError> {
        let info = validate_session_token(token, &self.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "session token rejected");
            AuthServiceError::Unauthenticated
        })?;

        let session = self
            .sessions
            .find_by_id(info.session_id)
            .await?
            .ok_or(AuthServiceError::Unauthenticated)?;

        if !session.is_valid(Duration::days(self.session_max_age_days), Utc::now()) {
            return Err(AuthServiceError::Unauthenticated);
        }

        self.students
            .find_by_id(session.student_id)
            .await?
            .ok_or(AuthServiceError::Unauthenticated)
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

/// Revoke the session referenced by a token, best-effort. Never fails from the
/// caller's perspective: an unverifiable token or a store error still ends in
/// "logged out", since the caller clears its cookie either way.
pub struct LogoutUseCase<E: SessionRepository> {
    pub sessions: E,
    pub jwt_secret: String,
}

impl<E: SessionRepository> LogoutUseCase<E> {
    pub async fn execute(&self, token: Option<&str>) {
        let Some(token) = token else { return };
        let Ok(info) = validate_session_token(token, &self.jwt_secret) else {
            tracing::debug!("logout with unverifiable token, clearing cookie only");
            return;
        };
        if let Err(e) = self.sessions.revoke(info.session_id).await {
            tracing::warn!(error = %e, session_id = %info.session_id, "session revocation failed");
        }
    }
}
