//! Repository Ports
//!
//! Async traits the application layer depends on. Infrastructure provides
//! the Postgres implementation; tests use the in-memory one.

use crate::domain::entity::{principal::Principal, session::Session};
use crate::domain::value_object::{credential::Credential, email::Email};
use crate::error::AuthResult;
use kernel::id::{PrincipalId, SessionId};

/// Principal persistence port
#[trait_variant::make(PrincipalRepository: Send)]
pub trait LocalPrincipalRepository {
    /// Persist a new principal. Duplicate email is `AuthError::EmailTaken`;
    /// under concurrent registration the storage unique constraint decides
    /// the single winner.
    async fn create_principal(&self, principal: &Principal) -> AuthResult<()>;

    async fn find_by_id(&self, id: &PrincipalId) -> AuthResult<Option<Principal>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Principal>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Replace the stored credential for an existing principal
    async fn update_credential(
        &self,
        id: &PrincipalId,
        credential: &Credential,
    ) -> AuthResult<()>;
}

/// Session persistence port
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    async fn find_session(&self, id: &SessionId) -> AuthResult<Option<Session>>;

    /// Persist mutated session state (flash queue, principal binding)
    async fn update_session(&self, session: &Session) -> AuthResult<()>;

    async fn delete_session(&self, id: &SessionId) -> AuthResult<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn delete_expired_sessions(&self) -> AuthResult<u64>;
}

/// Outbound notification port (recovery mail)
#[trait_variant::make(NotificationSender: Send)]
pub trait LocalNotificationSender {
    /// Deliver a plain-text notification. The body may carry a one-shot
    /// secret and must never be logged by implementations.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AuthResult<()>;
}
