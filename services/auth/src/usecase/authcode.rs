use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, MailerPort, StudentRepository};
use crate::domain::types::{AuthCode, OTP_CODE_LEN};
use crate::error::AuthServiceError;
use crate::usecase::ratelimit::{RateLimitDecision, RateLimiter};

/// Generate a fixed-length numeric login code. `rand::rng()` is a CSPRNG, so
/// codes are not guessable from previous ones.
fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub struct RequestCodeInput {
    pub email: String,
}

/// Issue a login code: resolve the student, consult the rate limiter, persist
/// the code, hand it to the mailer collaborator.
pub struct RequestCodeUseCase<S, A, M>
where
    S: StudentRepository,
    A: AuthCodeRepository,
    M: MailerPort,
{
    pub students: S,
    pub auth_codes: A,
    pub mailer: M,
    pub max_requests: u64,
    pub window_minutes: i64,
    pub fail_closed: bool,
}

impl<S, A, M> RequestCodeUseCase<S, A, M>
where
    S: StudentRepository,
    A: AuthCodeRepository,
    M: MailerPort,
{
    pub async fn execute(&self, input: RequestCodeInput) -> Result<(), AuthServiceError> {
        // 1. Resolve the student → 404 if unknown. Nothing is generated and the
        //    rate limiter is not consulted, so unknown emails cost nothing.
        let student = self
            .students
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::UnknownEmail)?;

        // 2. Rate limit → 429 with retry-after when the window is full.
        let limiter = RateLimiter {
            auth_codes: &self.auth_codes,
            max_requests: self.max_requests,
            window: Duration::minutes(self.window_minutes),
            fail_closed: self.fail_closed,
        };
        if let RateLimitDecision::Denied { retry_after_secs } = limiter.check(student.id).await? {
            return Err(AuthServiceError::RateLimited { retry_after_secs });
        }

        // 3. Generate and persist the code before attempting delivery. A code
        //    row that never reaches the inbox still counts toward the limiter,
        //    so delivery-failure retries cannot bypass it.
        let code = AuthCode {
            id: Uuid::new_v4(),
            student_id: student.id,
            code: generate_code(),
            created_at: Utc::now(),
            used: false,
        };
        self.auth_codes.create(&code).await?;

        // 4. Hand off to the mailer collaborator.
        if let Err(e) = self.mailer.send_code(&student.email, &code.code).await {
            tracing::warn!(error = %e, "login code delivery failed");
            return Err(AuthServiceError::DeliveryUnavailable);
        }
        Ok(())
    }
}
