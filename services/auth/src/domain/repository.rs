#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{AuthCode, Session, Student};
use crate::error::AuthServiceError;

/// Read-only lookup of student identities.
pub trait StudentRepository: Send + Sync {
    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, AuthServiceError>;
}

/// Repository for one-time login codes.
pub trait AuthCodeRepository: Send + Sync {
    async fn create(&self, code: &AuthCode) -> Result<(), AuthServiceError>;

    /// Most recently created unused code for the student matching `code`,
    /// created at or after `since`. Ordering is `created_at` descending so an
    /// old code whose digits coincide with a newer one is never considered.
    async fn find_latest_matching(
        &self,
        student_id: Uuid,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError>;

    /// Flip `used` to true. Called for successful verification and for
    /// expiry-triggered invalidation alike.
    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Count codes created at or after `since`, used or not. Feeds the rate
    /// limiter.
    async fn count_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError>;

    /// Oldest code inside the window; anchors the retry-after computation.
    async fn oldest_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError>;

    /// Bulk-delete codes created before `cutoff`, returning the count.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>)
    -> Result<u64, AuthServiceError>;
}

/// Repository for login sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError>;

    /// Idempotent; revoking a nonexistent session is not an error.
    async fn revoke(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Bulk-delete sessions created before `cutoff`, returning the count.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>)
    -> Result<u64, AuthServiceError>;
}

/// Port to the external email collaborator that delivers login codes.
/// Delivery guarantees are its problem; this core only hands over the code.
pub trait MailerPort: Send + Sync {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), AuthServiceError>;
}
