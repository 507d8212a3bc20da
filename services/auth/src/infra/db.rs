use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use handin_auth_schema::{auth_codes, sessions, students};

use crate::domain::repository::{AuthCodeRepository, SessionRepository, StudentRepository};
use crate::domain::types::{AuthCode, Session, Student};
use crate::error::AuthServiceError;

fn store_err(e: anyhow::Error) -> AuthServiceError {
    AuthServiceError::StoreUnavailable(e)
}

// ── Student repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
}

impl StudentRepository for DbStudentRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, AuthServiceError> {
        let model = students::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(students::Column::Email)))
                    .eq(email.to_lowercase()),
            )
            .one(&self.db)
            .await
            .context("find student by email")
            .map_err(store_err)?;
        Ok(model.map(student_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, AuthServiceError> {
        let model = students::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find student by id")
            .map_err(store_err)?;
        Ok(model.map(student_from_model))
    }
}

fn student_from_model(model: students::Model) -> Student {
    Student {
        id: model.id,
        email: model.email,
    }
}

// ── AuthCode repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthCodeRepository {
    pub db: DatabaseConnection,
}

impl AuthCodeRepository for DbAuthCodeRepository {
    async fn create(&self, code: &AuthCode) -> Result<(), AuthServiceError> {
        auth_codes::ActiveModel {
            id: Set(code.id),
            student_id: Set(code.student_id),
            code: Set(code.code.clone()),
            created_at: Set(code.created_at),
            used: Set(code.used),
        }
        .insert(&self.db)
        .await
        .context("create auth code")
        .map_err(store_err)?;
        Ok(())
    }

    async fn find_latest_matching(
        &self,
        student_id: Uuid,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError> {
        let model = auth_codes::Entity::find()
            .filter(auth_codes::Column::StudentId.eq(student_id))
            .filter(auth_codes::Column::Code.eq(code))
            .filter(auth_codes::Column::Used.eq(false))
            .filter(auth_codes::Column::CreatedAt.gte(since))
            .order_by_desc(auth_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest matching auth code")
            .map_err(store_err)?;
        Ok(model.map(authcode_from_model))
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError> {
        auth_codes::ActiveModel {
            id: Set(id),
            used: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark auth code used")
        .map_err(store_err)?;
        Ok(())
    }

    async fn count_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        auth_codes::Entity::find()
            .filter(auth_codes::Column::StudentId.eq(student_id))
            .filter(auth_codes::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await
            .context("count auth codes in window")
            .map_err(store_err)
    }

    async fn oldest_created_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<AuthCode>, AuthServiceError> {
        let model = auth_codes::Entity::find()
            .filter(auth_codes::Column::StudentId.eq(student_id))
            .filter(auth_codes::Column::CreatedAt.gte(since))
            .order_by_asc(auth_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find oldest auth code in window")
            .map_err(store_err)?;
        Ok(model.map(authcode_from_model))
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let result = auth_codes::Entity::delete_many()
            .filter(auth_codes::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .context("delete old auth codes")
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}

fn authcode_from_model(model: auth_codes::Model) -> AuthCode {
    AuthCode {
        id: model.id,
        student_id: model.student_id,
        code: model.code,
        created_at: model.created_at,
        used: model.used,
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        sessions::ActiveModel {
            id: Set(session.id),
            student_id: Set(session.student_id),
            created_at: Set(session.created_at),
            revoked: Set(session.revoked),
        }
        .insert(&self.db)
        .await
        .context("create session")
        .map_err(store_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError> {
        let model = sessions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find session by id")
            .map_err(store_err)?;
        Ok(model.map(session_from_model))
    }

    async fn revoke(&self, id: Uuid) -> Result<(), AuthServiceError> {
        // update_many so a missing row is a no-op, keeping revoke idempotent.
        sessions::Entity::update_many()
            .col_expr(sessions::Column::Revoked, Expr::value(true))
            .filter(sessions::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("revoke session")
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .context("delete old sessions")
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        student_id: model.student_id,
        created_at: model.created_at,
        revoked: model.revoked,
    }
}
