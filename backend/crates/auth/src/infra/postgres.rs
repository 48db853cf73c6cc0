//! Postgres Repository Implementation

use crate::domain::entity::{
    principal::{Principal, Profile},
    session::Session,
};
use crate::domain::repository::{PrincipalRepository, SessionRepository};
use crate::domain::value_object::{credential::Credential, email::Email, role::Role};
use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{PrincipalId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

/// Postgres-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    principal_id: Uuid,
    email: String,
    credential: String,
    role: String,
    name: String,
    date_of_birth: NaiveDate,
    contact_number: String,
    department: Option<String>,
    skills: Vec<String>,
    designation: Option<String>,
    created_at: DateTime<Utc>,
}

impl PrincipalRow {
    fn try_into_principal(self) -> AuthResult<Principal> {
        Ok(Principal {
            principal_id: PrincipalId::from_uuid(self.principal_id),
            email: Email::from_db(self.email),
            credential: Credential::from_phc_string(self.credential)?,
            role: Role::from_code(&self.role)?,
            profile: Profile {
                name: self.name,
                date_of_birth: self.date_of_birth,
                contact_number: self.contact_number,
                department: self.department,
                skills: self.skills,
                designation: self.designation,
            },
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    principal_id: Option<Uuid>,
    csrf_token: String,
    flash: Vec<String>,
    created_at_ms: i64,
    expires_at_ms: i64,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            session_id: SessionId::from_uuid(row.session_id),
            principal_id: row.principal_id.map(PrincipalId::from_uuid),
            csrf_token: row.csrf_token,
            flash: row.flash,
            created_at_ms: row.created_at_ms,
            expires_at_ms: row.expires_at_ms,
        }
    }
}

const PRINCIPAL_COLUMNS: &str = "principal_id, email, credential, role, name, date_of_birth, \
     contact_number, department, skills, designation, created_at";

// ============================================================================
// PrincipalRepository
// ============================================================================

impl PrincipalRepository for PgAuthRepository {
    async fn create_principal(&self, principal: &Principal) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO principals
                (principal_id, email, credential, role, name, date_of_birth,
                 contact_number, department, skills, designation, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(principal.principal_id.as_uuid())
        .bind(principal.email.as_str())
        .bind(principal.credential.as_phc_string())
        .bind(principal.role.as_code())
        .bind(&principal.profile.name)
        .bind(principal.profile.date_of_birth)
        .bind(&principal.profile.contact_number)
        .bind(&principal.profile.department)
        .bind(&principal.profile.skills)
        .bind(&principal.profile.designation)
        .bind(principal.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique index on email decides concurrent registration races
            Err(e) if is_unique_violation(&e) => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &PrincipalId) -> AuthResult<Option<Principal>> {
        let row: Option<PrincipalRow> = sqlx::query_as(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE principal_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRow::try_into_principal).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>> {
        let row: Option<PrincipalRow> = sqlx::query_as(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PrincipalRow::try_into_principal).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: Option<(bool,)> =
            sqlx::query_as("SELECT TRUE FROM principals WHERE email = $1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(exists.is_some())
    }

    async fn update_credential(
        &self,
        id: &PrincipalId,
        credential: &Credential,
    ) -> AuthResult<()> {
        let result = sqlx::query("UPDATE principals SET credential = $2 WHERE principal_id = $1")
            .bind(id.as_uuid())
            .bind(credential.as_phc_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::AccountNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// SessionRepository
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions
                (session_id, principal_id, csrf_token, flash, created_at_ms, expires_at_ms)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.principal_id.map(|id| id.into_uuid()))
        .bind(&session.csrf_token)
        .bind(&session.flash)
        .bind(session.created_at_ms)
        .bind(session.expires_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, id: &SessionId) -> AuthResult<Option<Session>> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT session_id, principal_id, csrf_token, flash, created_at_ms, expires_at_ms \
             FROM sessions WHERE session_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    async fn update_session(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            "UPDATE sessions SET principal_id = $2, csrf_token = $3, flash = $4, \
             expires_at_ms = $5 WHERE session_id = $1",
        )
        .bind(session.session_id.as_uuid())
        .bind(session.principal_id.map(|id| id.into_uuid()))
        .bind(&session.csrf_token)
        .bind(&session.flash)
        .bind(session.expires_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired_sessions(&self) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at_ms <= $1")
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
