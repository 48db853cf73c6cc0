//! SMTP Mail Delivery
//!
//! Thin wrapper around `lettre` for transactional mail. Bodies may carry
//! one-shot secrets (freshly generated credentials), so neither the body
//! nor the subject is ever logged here.

use lettre::message::Mailbox;
use lettre::transport::smtp::PoolConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Recipient or sender address failed to parse
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    /// Message construction failed
    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    /// SMTP transport setup failed
    #[error("Failed to create SMTP transport: {0}")]
    TransportFailed(String),

    /// The SMTP server did not accept the message
    #[error("Mail delivery failed: {0}")]
    SendFailed(String),
}

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay host, e.g. "smtp.gmail.com"
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address used in the From header
    pub from_address: String,
    /// Display name for the From header
    pub from_name: String,
}

/// Pooled SMTP mailer
///
/// `send` blocks on the SMTP round trip; callers on an async runtime must
/// run it via `spawn_blocking`.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer with a relay transport (STARTTLS/TLS required)
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("from address: {e}")))?;

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| MailError::TransportFailed(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.port)
            .pool_config(PoolConfig::new().max_size(2))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        Ok(Self { transport, from })
    }

    /// Send a plain-text message
    pub fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| MailError::InvalidAddress(format!("to address: {e}")))?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::BuildFailed(e.to_string()))?;

        self.transport
            .send(&email)
            .map(|_| ())
            .map_err(|e| MailError::SendFailed(e.to_string()))
    }
}
