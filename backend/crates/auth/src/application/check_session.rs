//! Session Resolution Use Case
//!
//! Turns a signed cookie token back into a live session and, for
//! authenticated sessions, the current principal. The principal record is
//! re-read on every call; nothing user-visible is cached in the token, so
//! a role or email change takes effect on the next request.

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::{principal::Principal, session::Session};
use crate::domain::repository::{PrincipalRepository, SessionRepository};
use crate::domain::value_object::role::Role;
use crate::error::{AuthError, AuthResult};
use std::sync::Arc;

/// Snapshot returned by the status endpoint
#[derive(Debug)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub expires_at_ms: Option<i64>,
}

impl SessionStatus {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            email: None,
            role: None,
            expires_at_ms: None,
        }
    }
}

/// Session resolution use case
pub struct CheckSessionUseCase<R, S> {
    principals: Arc<R>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<R, S> CheckSessionUseCase<R, S>
where
    R: PrincipalRepository + Sync,
    S: SessionRepository + Sync,
{
    pub fn new(principals: Arc<R>, sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            principals,
            sessions,
            config,
        }
    }

    /// Resolve a token into a live session (authenticated or not)
    ///
    /// An expired session is deleted on sight and reported as invalid.
    pub async fn load_session(&self, session_token: &str) -> AuthResult<Session> {
        let session_id = token::parse_session_token(&self.config.session_secret, session_token)?;

        let session = self
            .sessions
            .find_session(&session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.sessions.delete_session(&session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        Ok(session)
    }

    /// Resolve a token into the currently stored principal
    ///
    /// Requires an authenticated session. The principal is fetched fresh
    /// from the store; if the account has been removed since sign-in the
    /// session is deleted and the caller is treated as signed out.
    pub async fn current_principal(
        &self,
        session_token: &str,
    ) -> AuthResult<(Session, Principal)> {
        let session = self.load_session(session_token).await?;

        let principal_id = session.principal_id.ok_or(AuthError::SessionInvalid)?;

        match self.principals.find_by_id(&principal_id).await? {
            Some(principal) => Ok((session, principal)),
            None => {
                self.sessions.delete_session(&session.session_id).await?;
                Err(AuthError::SessionInvalid)
            }
        }
    }

    /// Status snapshot for the client
    ///
    /// Never errors on an absent or invalid token; that is just an
    /// anonymous caller.
    pub async fn status(&self, session_token: Option<&str>) -> AuthResult<SessionStatus> {
        let Some(session_token) = session_token else {
            return Ok(SessionStatus::anonymous());
        };

        let session = match self.load_session(session_token).await {
            Ok(session) => session,
            Err(AuthError::SessionInvalid) => return Ok(SessionStatus::anonymous()),
            Err(e) => return Err(e),
        };

        if !session.is_authenticated() {
            return Ok(SessionStatus {
                authenticated: false,
                email: None,
                role: None,
                expires_at_ms: Some(session.expires_at_ms),
            });
        }

        match self.current_principal(session_token).await {
            Ok((session, principal)) => Ok(SessionStatus {
                authenticated: true,
                email: Some(principal.email.as_str().to_string()),
                role: Some(principal.role),
                expires_at_ms: Some(session.expires_at_ms),
            }),
            Err(AuthError::SessionInvalid) => Ok(SessionStatus::anonymous()),
            Err(e) => Err(e),
        }
    }
}
