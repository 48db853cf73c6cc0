//! Notification Outbox
//!
//! Decouples the credential mutation from notification delivery. The
//! mutation commits first; delivery is recorded against an idempotency key
//! derived from the principal and the new credential, so a retry of the
//! same reset sends at most one mail. A failed delivery stays pending for
//! an explicit `flush`; nothing retries automatically inside the request.

use crate::domain::repository::NotificationSender;
use crate::domain::value_object::credential::Credential;
use crate::error::{AuthError, AuthResult};
use kernel::id::PrincipalId;
use platform::crypto;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Idempotency key for one credential change
pub type DeliveryKey = [u8; 32];

/// How long a delivered marker suppresses a duplicate send
const DELIVERED_RETENTION: Duration = Duration::from_secs(60 * 60);

/// How long an undelivered body waits for a flush before being dropped
const PENDING_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Derive the idempotency key for a credential change
///
/// Keyed on the principal and the new credential hash: the same reset maps
/// to the same key, while a later reset for the same principal gets a new
/// one.
pub fn delivery_key(principal_id: &PrincipalId, credential: &Credential) -> DeliveryKey {
    let mut input = Vec::with_capacity(16 + credential.as_phc_string().len());
    input.extend_from_slice(principal_id.as_uuid().as_bytes());
    input.extend_from_slice(credential.as_phc_string().as_bytes());
    crypto::sha256(&input)
}

#[derive(Debug, Clone)]
struct PendingNotification {
    to: String,
    subject: String,
    body: String,
}

#[derive(Debug)]
enum EntryState {
    /// Message retained in memory for an explicit retry
    Pending {
        message: PendingNotification,
        since: Instant,
    },
    /// Delivered; the body is dropped, only the marker remains
    Delivered { at: Instant },
}

/// In-memory delivery outbox
///
/// Entries are evicted after a retention window so the map stays bounded:
/// delivered markers after `DELIVERED_RETENTION` (idempotency only holds
/// inside that window), pending bodies after `PENDING_RETENTION` (the
/// credential mutation is already committed, so the user can re-run
/// recovery).
pub struct DeliveryOutbox<N> {
    sender: Arc<N>,
    entries: Mutex<HashMap<DeliveryKey, EntryState>>,
    delivered_retention: Duration,
    pending_retention: Duration,
}

impl<N: NotificationSender + Sync> DeliveryOutbox<N> {
    pub fn new(sender: Arc<N>) -> Self {
        Self::with_retention(sender, DELIVERED_RETENTION, PENDING_RETENTION)
    }

    pub fn with_retention(
        sender: Arc<N>,
        delivered_retention: Duration,
        pending_retention: Duration,
    ) -> Self {
        Self {
            sender,
            entries: Mutex::new(HashMap::new()),
            delivered_retention,
            pending_retention,
        }
    }

    fn evict_expired(&self, entries: &mut HashMap<DeliveryKey, EntryState>) {
        let now = Instant::now();
        entries.retain(|_, state| match state {
            EntryState::Delivered { at } => now.duration_since(*at) < self.delivered_retention,
            EntryState::Pending { since, .. } => {
                let keep = now.duration_since(*since) < self.pending_retention;
                if !keep {
                    tracing::warn!("Dropping undelivered notification past its retention window");
                }
                keep
            }
        });
    }

    /// Record and attempt one delivery
    ///
    /// Returns Ok immediately if this key was already delivered. On
    /// transport failure the entry stays pending and the caller gets a
    /// `Delivery` error to surface (the mutation itself already committed).
    pub async fn deliver(
        &self,
        key: DeliveryKey,
        to: &str,
        subject: &str,
        body: &str,
    ) -> AuthResult<()> {
        {
            let mut entries = self.entries.lock().await;
            self.evict_expired(&mut entries);
            if matches!(entries.get(&key), Some(EntryState::Delivered { .. })) {
                return Ok(());
            }
            entries.insert(
                key,
                EntryState::Pending {
                    message: PendingNotification {
                        to: to.to_string(),
                        subject: subject.to_string(),
                        body: body.to_string(),
                    },
                    since: Instant::now(),
                },
            );
        }

        match self.sender.send(to, subject, body).await {
            Ok(()) => {
                self.entries
                    .lock()
                    .await
                    .insert(key, EntryState::Delivered { at: Instant::now() });
                Ok(())
            }
            Err(e) => Err(AuthError::Delivery(e.to_string())),
        }
    }

    /// Retry every pending entry, returning how many were delivered
    pub async fn flush(&self) -> AuthResult<u64> {
        let pending: Vec<(DeliveryKey, PendingNotification)> = {
            let mut entries = self.entries.lock().await;
            self.evict_expired(&mut entries);
            entries
                .iter()
                .filter_map(|(key, state)| match state {
                    EntryState::Pending { message, .. } => Some((*key, message.clone())),
                    EntryState::Delivered { .. } => None,
                })
                .collect()
        };

        let mut delivered = 0u64;
        for (key, message) in pending {
            if self
                .sender
                .send(&message.to, &message.subject, &message.body)
                .await
                .is_ok()
            {
                self.entries
                    .lock()
                    .await
                    .insert(key, EntryState::Delivered { at: Instant::now() });
                delivered += 1;
            }
        }

        Ok(delivered)
    }

    /// Number of entries still awaiting delivery
    pub async fn pending_count(&self) -> usize {
        self.entries
            .lock()
            .await
            .values()
            .filter(|state| matches!(state, EntryState::Pending { .. }))
            .count()
    }
}
