//! Session Entity
//!
//! Server-side session record. The client holds only a signed session id;
//! everything else (principal binding, CSRF token, flash queue) lives here.

use chrono::Utc;
use kernel::id::{PrincipalId, SessionId};
use std::time::Duration;

/// Server-side session state
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    /// None until sign-in succeeds; a session can exist before authentication
    /// so the CSRF token has somewhere to live.
    pub principal_id: Option<PrincipalId>,
    /// Per-session CSRF token, compared in constant time by the guard
    pub csrf_token: String,
    /// One-shot messages, drained on read
    pub flash: Vec<String>,
    pub created_at_ms: i64,
    pub expires_at_ms: i64,
}

impl Session {
    /// Create an anonymous (pre-authentication) session
    pub fn anonymous(csrf_token: String, ttl: Duration) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            session_id: SessionId::new(),
            principal_id: None,
            csrf_token,
            flash: Vec::new(),
            created_at_ms: now,
            expires_at_ms: now + ttl.as_millis() as i64,
        }
    }

    /// Create a fresh authenticated session
    ///
    /// Sign-in never reuses a pre-authentication session id; callers discard
    /// the old record and issue this one.
    pub fn for_principal(principal_id: PrincipalId, csrf_token: String, ttl: Duration) -> Self {
        let mut session = Self::anonymous(csrf_token, ttl);
        session.principal_id = Some(principal_id);
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal_id.is_some()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.expires_at_ms
    }

    /// Queue a one-shot message
    pub fn push_flash(&mut self, message: impl Into<String>) {
        self.flash.push(message.into());
    }

    /// Drain all queued messages (read-and-clear)
    pub fn take_flash(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flash)
    }
}
