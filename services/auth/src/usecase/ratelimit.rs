use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::AuthCodeRepository;
use crate::error::AuthServiceError;

/// Outcome of a rate-limit check.
#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

/// Sliding-window limiter over code-issuance attempts. The window is derived
/// on demand from `auth_codes` rows — no separate counter state to keep
/// consistent.
///
/// On a store failure the limiter allows by default: it is an anti-abuse
/// control, not a security boundary, so availability wins. Deployments with
/// strict abuse requirements set `fail_closed` and get the store error
/// propagated instead.
pub struct RateLimiter<'a, A: AuthCodeRepository> {
    pub auth_codes: &'a A,
    pub max_requests: u64,
    pub window: Duration,
    pub fail_closed: bool,
}

impl<'a, A: AuthCodeRepository> RateLimiter<'a, A> {
    pub async fn check(&self, student_id: Uuid) -> Result<RateLimitDecision, AuthServiceError> {
        let now = Utc::now();
        let since = now - self.window;

        let count = match self.auth_codes.count_created_since(student_id, since).await {
            Ok(count) => count,
            Err(e) => return self.on_store_error(e),
        };
        if count < self.max_requests {
            return Ok(RateLimitDecision::Allowed);
        }

        let oldest = match self.auth_codes.oldest_created_since(student_id, since).await {
            Ok(oldest) => oldest,
            Err(e) => return self.on_store_error(e),
        };
        // The window frees up when its oldest entry slides out.
        let retry_after_secs = oldest
            .map(|c| (c.created_at + self.window - now).num_seconds().max(0) as u64)
            .unwrap_or(0);

        Ok(RateLimitDecision::Denied { retry_after_secs })
    }

    fn on_store_error(
        &self,
        e: AuthServiceError,
    ) -> Result<RateLimitDecision, AuthServiceError> {
        if self.fail_closed {
            return Err(e);
        }
        tracing::warn!(error = %e, "rate-limit check failed, allowing request");
        Ok(RateLimitDecision::Allowed)
    }
}
