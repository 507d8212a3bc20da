use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use handin_auth::domain::repository::{
    AuthCodeRepository, MailerPort, SessionRepository, StudentRepository,
};
use handin_auth::domain::types::{AuthCode, Session, Student};
use handin_auth::error::AuthServiceError;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests";

pub fn test_student() -> Student {
    Student {
        id: Uuid::new_v4(),
        email: "e@x.com".to_owned(),
    }
}

/// A code created `age` ago.
pub fn test_code(student_id: Uuid, code: &str, age: Duration) -> AuthCode {
    AuthCode {
        id: Uuid::new_v4(),
        student_id,
        code: code.to_owned(),
        created_at: Utc::now() - age,
        used: false,
    }
}

pub fn test_session(student_id: Uuid, age: Duration) -> Session {
    Session {
        id: Uuid::new_v4(),
        student_id,
        created_at: Utc::now() - age,
        revoked: false,
    }
}

fn mock_store_error() -> AuthServiceError {
    AuthServiceError::StoreUnavailable(anyhow!("mock store failure"))
}

// ── MockStudentRepo ──────────────────────────────────────────────────────────

pub struct MockStudentRepo {
    pub students: Vec<Student>,
}

impl MockStudentRepo {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn empty() -> Self {
        Self { students: vec![] }
    }
}

impl StudentRepository for MockStudentRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, AuthServiceError> {
        let email = email.to_lowercase();
        Ok(self
            .students
            .iter()
            .find(|s| s.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, AuthServiceError> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }
}

// ── MockAuthCodeRepo ─────────────────────────────────────────────────────────

/// In-memory auth-code store mirroring the query semantics of the real
/// repository. `fail_window_queries` makes the rate-limit reads (count/oldest)
/// fail while the rest keeps working, to exercise fail-open vs fail-closed.
pub struct MockAuthCodeRepo {
    pub codes: Arc<Mutex<Vec<AuthCode>>>,
    pub fail_window_queries: bool,
}

impl MockAuthCodeRepo {
    pub fn new(codes: Vec<AuthCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            fail_window_queries: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn failing_window_queries() -> Self {
        Self {
            codes: Arc::new(Mutex::new(vec![])),
            fail_window_queries: true,
        }
    }

    /// Shared handle to the internal code list for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<AuthCode>>> {
        Arc::clone(&self.codes)
    }
}

impl AuthCodeRepository for MockAuthCodeRepo {
    async fn create(&self, code: &AuthCode) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_latest_matching(
        &self,
        student_id: Uuid,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| {
                c.student_id == student_id && c.code == code && !c.used && c.created_at >= since
            })
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        if let Some(c) = codes.iter_mut().find(|c| c.id == id) {
            c.used = true;
        }
        Ok(())
    }

    async fn count_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        if self.fail_window_queries {
            return Err(mock_store_error());
        }
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.student_id == student_id && c.created_at >= since)
            .count() as u64)
    }

    async fn oldest_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError> {
        if self.fail_window_queries {
            return Err(mock_store_error());
        }
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.student_id == student_id && c.created_at >= since)
            .min_by_key(|c| c.created_at)
            .cloned())
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.created_at >= cutoff);
        Ok((before - codes.len()) as u64)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(s) = sessions.iter_mut().find(|s| s.id == id) {
            s.revoked = true;
        }
        Ok(())
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.created_at >= cutoff);
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.sent)
    }
}

impl MailerPort for MockMailer {
    async fn send_code(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::DeliveryUnavailable);
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}
