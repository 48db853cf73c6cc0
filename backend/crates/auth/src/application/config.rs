//! Auth Configuration

use platform::cookie::SameSite;
use std::time::Duration;

/// Session lifetime: 180 minutes
pub const SESSION_TTL: Duration = Duration::from_secs(180 * 60);

/// Name of the signed session cookie
pub const SESSION_COOKIE_NAME: &str = "hrms_session";

/// Name of the readable CSRF cookie (double-submit pair)
pub const CSRF_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Header the client echoes the CSRF token in
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Auth module configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for session token signing
    pub session_secret: [u8; 32],
    /// Optional application-wide pepper mixed into password hashing
    pub password_pepper: Option<Vec<u8>>,
    /// Session lifetime
    pub session_ttl: Duration,
    /// Upper bound on concurrent Argon2 hashing jobs
    pub max_concurrent_hashes: usize,
    /// Set the Secure attribute on cookies (off for plain-HTTP dev)
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl AuthConfig {
    pub fn new(session_secret: [u8; 32]) -> Self {
        Self {
            session_secret,
            password_pepper: None,
            session_ttl: SESSION_TTL,
            max_concurrent_hashes: 4,
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
        }
    }

    /// Development configuration: random secret, cookies work over HTTP
    pub fn development() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        let mut config = Self::new(secret);
        config.cookie_secure = false;
        config
    }

    pub fn with_pepper(mut self, pepper: Vec<u8>) -> Self {
        self.password_pepper = Some(pepper);
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
