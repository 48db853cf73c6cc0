//! In-Memory Implementations
//!
//! Backing store and notification sender for tests and local development.
//! Uniqueness and expiry behave like the Postgres implementation so use
//! cases can be exercised without a database.

use crate::domain::entity::{principal::Principal, session::Session};
use crate::domain::repository::{NotificationSender, PrincipalRepository, SessionRepository};
use crate::domain::value_object::{credential::Credential, email::Email};
use crate::error::{AuthError, AuthResult};
use chrono::Utc;
use kernel::id::{PrincipalId, SessionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock still holds usable data for a test double
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    principals: Arc<Mutex<HashMap<Uuid, Principal>>>,
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal directly, bypassing uniqueness checks.
    /// For seeding fixtures and simulating out-of-band profile edits.
    pub fn upsert_principal(&self, principal: Principal) {
        lock(&self.principals).insert(principal.principal_id.into_uuid(), principal);
    }

    pub fn principal_count(&self) -> usize {
        lock(&self.principals).len()
    }

    pub fn session_count(&self) -> usize {
        lock(&self.sessions).len()
    }
}

impl PrincipalRepository for InMemoryAuthRepository {
    async fn create_principal(&self, principal: &Principal) -> AuthResult<()> {
        let mut principals = lock(&self.principals);

        let duplicate = principals
            .values()
            .any(|existing| existing.email == principal.email);
        if duplicate {
            return Err(AuthError::EmailTaken);
        }

        principals.insert(principal.principal_id.into_uuid(), principal.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PrincipalId) -> AuthResult<Option<Principal>> {
        Ok(lock(&self.principals).get(id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>> {
        Ok(lock(&self.principals)
            .values()
            .find(|principal| &principal.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(lock(&self.principals)
            .values()
            .any(|principal| &principal.email == email))
    }

    async fn update_credential(
        &self,
        id: &PrincipalId,
        credential: &Credential,
    ) -> AuthResult<()> {
        let mut principals = lock(&self.principals);
        let principal = principals
            .get_mut(id.as_uuid())
            .ok_or(AuthError::AccountNotFound)?;
        principal.set_credential(credential.clone());
        Ok(())
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()> {
        lock(&self.sessions).insert(session.session_id.into_uuid(), session.clone());
        Ok(())
    }

    async fn find_session(&self, id: &SessionId) -> AuthResult<Option<Session>> {
        Ok(lock(&self.sessions).get(id.as_uuid()).cloned())
    }

    async fn update_session(&self, session: &Session) -> AuthResult<()> {
        lock(&self.sessions).insert(session.session_id.into_uuid(), session.clone());
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> AuthResult<()> {
        lock(&self.sessions).remove(id.as_uuid());
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> AuthResult<u64> {
        let now = Utc::now().timestamp_millis();
        let mut sessions = lock(&self.sessions);
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at_ms > now);
        Ok((before - sessions.len()) as u64)
    }
}

// ============================================================================
// Notification sender
// ============================================================================

/// A captured notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// In-memory notification sender
///
/// Records every delivered message; `fail_next` makes the next send fail
/// once, for exercising the outbox's pending path.
#[derive(Clone, Default)]
pub struct MemorySender {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `send` fail with the given reason
    pub fn fail_next(&self, reason: &str) {
        *lock(&self.fail_next) = Some(reason.to_string());
    }

    /// Everything delivered so far
    pub fn sent(&self) -> Vec<SentMail> {
        lock(&self.sent).clone()
    }
}

impl NotificationSender for MemorySender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AuthResult<()> {
        if let Some(reason) = lock(&self.fail_next).take() {
            return Err(AuthError::Delivery(reason));
        }

        lock(&self.sent).push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
