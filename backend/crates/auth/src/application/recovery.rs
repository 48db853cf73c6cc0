//! Password Recovery Use Case
//!
//! Reset-by-replacement: a fresh random password is generated, hashed, and
//! stored, then mailed to the account's address through the outbox. The
//! old credential is invalid the moment the store is updated. The
//! plaintext exists only inside this flow and is never logged.

use crate::application::hasher::CredentialHasher;
use crate::application::outbox::{delivery_key, DeliveryOutbox};
use crate::domain::repository::{NotificationSender, PrincipalRepository};
use crate::domain::value_object::{credential::RawPassword, email::Email};
use crate::error::{AuthError, AuthResult};
use std::sync::Arc;

/// Acknowledgement returned to the client on success
pub const RECOVERY_SUCCESS_MESSAGE: &str = "A new password has been sent to your email.";

const MAIL_SUBJECT: &str = "Your new password";

/// Password recovery use case
pub struct PasswordRecoveryUseCase<R, N> {
    principals: Arc<R>,
    hasher: CredentialHasher,
    outbox: Arc<DeliveryOutbox<N>>,
}

impl<R, N> PasswordRecoveryUseCase<R, N>
where
    R: PrincipalRepository + Sync,
    N: NotificationSender + Sync,
{
    pub fn new(
        principals: Arc<R>,
        hasher: CredentialHasher,
        outbox: Arc<DeliveryOutbox<N>>,
    ) -> Self {
        Self {
            principals,
            hasher,
            outbox,
        }
    }

    /// Execute the recovery flow for a submitted email
    ///
    /// Order matters: validate, look up, mutate, then deliver. An unknown
    /// email mutates nothing. A delivery failure after the mutation is
    /// reported as such; the new credential stays in force and the message
    /// waits in the outbox.
    pub async fn execute(&self, raw_email: String) -> AuthResult<&'static str> {
        let email = Email::new(raw_email)?;

        let mut principal = self
            .principals
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let new_password = RawPassword::generate();
        let body = format!(
            "Hello {},\n\nYour password has been reset. Use this password to sign in:\n\n{}\n\nPlease change it after signing in.",
            principal.profile.name,
            new_password.expose()
        );

        let credential = self.hasher.hash(new_password).await?;
        self.principals
            .update_credential(&principal.principal_id, &credential)
            .await?;
        principal.set_credential(credential.clone());

        tracing::info!(
            principal_id = %principal.principal_id,
            "Credential rotated for recovery"
        );

        let key = delivery_key(&principal.principal_id, &credential);
        self.outbox
            .deliver(key, principal.email.as_str(), MAIL_SUBJECT, &body)
            .await?;

        Ok(RECOVERY_SUCCESS_MESSAGE)
    }
}
