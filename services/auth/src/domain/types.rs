use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Student identity as seen by the auth service: a stable id plus the email
/// address login codes are delivered to.
#[derive(Debug, Clone)]
pub struct Student {
    pub id: Uuid,
    pub email: String,
}

/// One-time login code. Expiry is derived, not stored: a code expires at
/// `created_at + otp_ttl`.
#[derive(Debug, Clone)]
pub struct AuthCode {
    pub id: Uuid,
    pub student_id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub used: bool,
}

impl AuthCode {
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.created_at + ttl
    }
}

/// Granted login, independently revocable on the server side.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Session {
    /// A session is valid iff it is not revoked and has not outlived `max_age`.
    pub fn is_valid(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        !self.revoked && now - self.created_at <= max_age
    }
}

/// Login code length in digits.
pub const OTP_CODE_LEN: usize = 6;

/// How far back verification looks for a matching code. Bounds the query, not
/// the expiry — expiry is the (shorter, configurable) code TTL.
pub const OTP_LOOKBACK_MINUTES: i64 = 15;
