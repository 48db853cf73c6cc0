//! SMTP Notification Sender
//!
//! Bridges the async `NotificationSender` port to the blocking platform
//! mailer via the blocking thread pool.

use crate::domain::repository::NotificationSender;
use crate::error::{AuthError, AuthResult};
use platform::mailer::SmtpMailer;

/// SMTP-backed notification sender
#[derive(Clone)]
pub struct SmtpSender {
    mailer: SmtpMailer,
}

impl SmtpSender {
    pub fn new(mailer: SmtpMailer) -> Self {
        Self { mailer }
    }
}

impl NotificationSender for SmtpSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AuthResult<()> {
        let mailer = self.mailer.clone();
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        tokio::task::spawn_blocking(move || mailer.send(&to, &subject, &body))
            .await
            .map_err(|e| AuthError::Internal(format!("mail task failed: {e}")))?
            .map_err(|e| AuthError::Delivery(e.to_string()))
    }
}
