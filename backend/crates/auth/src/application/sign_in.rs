//! Sign-In Use Case
//!
//! Runs the `signin` strategy, then converts an authenticated verdict into
//! a brand-new server-side session and a signed cookie token. Any session
//! the caller held before authenticating is discarded, never upgraded.

use crate::application::config::AuthConfig;
use crate::application::csrf;
use crate::application::strategy::{AuthAttempt, Rejection, SignInAttempt, StrategyRegistry, Verdict, SIGN_IN};
use crate::application::token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{PrincipalRepository, SessionRepository};
use crate::error::{AuthError, AuthResult};
use kernel::id::SessionId;
use std::sync::Arc;

/// Result of a sign-in attempt
#[derive(Debug)]
pub enum SignInOutcome {
    /// Authenticated; cookies to set and where to send the client
    Success {
        session_token: String,
        csrf_token: String,
        redirect_to: &'static str,
    },
    /// Turned away; the reason was queued on the prior session's flash
    Rejected(Rejection),
}

/// Sign-in use case
pub struct SignInUseCase<R, S> {
    registry: Arc<StrategyRegistry<R>>,
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<R, S> SignInUseCase<R, S>
where
    R: PrincipalRepository + Sync,
    S: SessionRepository + Sync,
{
    pub fn new(
        registry: Arc<StrategyRegistry<R>>,
        sessions: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            registry,
            sessions,
            config,
        }
    }

    /// Execute the sign-in flow
    ///
    /// `prior_session` is the session the caller held before this attempt,
    /// if any. On success it is deleted and a fresh session id is issued
    /// (session fixation defense); on rejection it receives the flash
    /// message.
    pub async fn execute(
        &self,
        attempt: SignInAttempt,
        prior_session: Option<SessionId>,
    ) -> AuthResult<SignInOutcome> {
        let strategy = self
            .registry
            .get(SIGN_IN)
            .ok_or_else(|| AuthError::Internal("signin strategy not registered".to_string()))?;

        match strategy.authenticate(AuthAttempt::SignIn(attempt)).await {
            Verdict::Errored(e) => Err(e),
            Verdict::Rejected(rejection) => {
                if let Some(session_id) = prior_session {
                    self.queue_flash(&session_id, rejection.message()).await?;
                }
                Ok(SignInOutcome::Rejected(rejection))
            }
            Verdict::Authenticated(principal) => {
                if let Some(session_id) = prior_session {
                    self.sessions.delete_session(&session_id).await?;
                }

                let csrf_token = csrf::issue_token();
                let session = Session::for_principal(
                    principal.principal_id,
                    csrf_token.clone(),
                    self.config.session_ttl,
                );
                self.sessions.create_session(&session).await?;

                let session_token =
                    token::sign_session_token(&self.config.session_secret, &session.session_id)?;

                tracing::info!(
                    principal_id = %principal.principal_id,
                    role = %principal.role,
                    "Sign-in succeeded"
                );

                Ok(SignInOutcome::Success {
                    session_token,
                    csrf_token,
                    redirect_to: principal.role.dashboard_path(),
                })
            }
        }
    }

    async fn queue_flash(&self, session_id: &SessionId, message: &str) -> AuthResult<()> {
        if let Some(mut session) = self.sessions.find_session(session_id).await? {
            if !session.is_expired() {
                session.push_flash(message);
                self.sessions.update_session(&session).await?;
            }
        }
        Ok(())
    }
}
