use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;
use crate::infra::db::{DbAuthCodeRepository, DbSessionRepository, DbStudentRepository};
use crate::infra::mailer::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
/// Configuration is loaded once at startup and immutable from here on.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: HttpMailer,
    pub config: Arc<AuthConfig>,
}

impl AppState {
    pub fn student_repo(&self) -> DbStudentRepository {
        DbStudentRepository {
            db: self.db.clone(),
        }
    }

    pub fn auth_code_repo(&self) -> DbAuthCodeRepository {
        DbAuthCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }
}
