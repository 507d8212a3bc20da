use chrono::{Duration, Utc};

use crate::domain::repository::{AuthCodeRepository, SessionRepository};
use crate::error::AuthServiceError;

#[derive(Debug, PartialEq, Eq)]
pub struct CleanupOutput {
    pub sessions_deleted: u64,
    pub auth_codes_deleted: u64,
}

/// Delete sessions past their max age and login codes past their retention
/// window (used or not). Idempotent — a second run right after the first
/// deletes nothing — and safe to run concurrently with normal traffic, since
/// it only matches rows an age predicate already made unusable.
pub struct CleanupUseCase<E, A>
where
    E: SessionRepository,
    A: AuthCodeRepository,
{
    pub sessions: E,
    pub auth_codes: A,
    pub session_max_age_days: i64,
    pub code_retention_hours: i64,
}

impl<E, A> CleanupUseCase<E, A>
where
    E: SessionRepository,
    A: AuthCodeRepository,
{
    pub async fn execute(&self) -> Result<CleanupOutput, AuthServiceError> {
        let now = Utc::now();
        let sessions_deleted = self
            .sessions
            .delete_created_before(now - Duration::days(self.session_max_age_days))
            .await?;
        let auth_codes_deleted = self
            .auth_codes
            .delete_created_before(now - Duration::hours(self.code_retention_hours))
            .await?;
        Ok(CleanupOutput {
            sessions_deleted,
            auth_codes_deleted,
        })
    }
}
