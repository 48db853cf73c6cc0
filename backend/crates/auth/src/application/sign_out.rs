//! Sign-Out Use Case
//!
//! Best-effort teardown. A malformed or already-expired token still signs
//! the caller out; the cookies get cleared by the handler either way.

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;
use std::sync::Arc;

/// Sign-out use case
pub struct SignOutUseCase<S> {
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S: SessionRepository + Sync> SignOutUseCase<S> {
    pub fn new(sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }

    /// Delete the server-side session behind a token, if it verifies
    pub async fn execute(&self, session_token: &str) -> AuthResult<()> {
        let Ok(session_id) = token::parse_session_token(&self.config.session_secret, session_token)
        else {
            // Nothing server-side to tear down
            return Ok(());
        };

        self.sessions.delete_session(&session_id).await?;
        tracing::info!(session_id = %session_id, "Signed out");
        Ok(())
    }
}
