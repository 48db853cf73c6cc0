//! Hashing Admission Control
//!
//! Argon2id is memory-hard on purpose, which makes unbounded concurrent
//! hashing a self-inflicted denial of service. All hash and verify work
//! goes through this service: a semaphore caps concurrency and the work
//! itself runs on the blocking thread pool.

use crate::domain::value_object::credential::{Credential, RawPassword};
use crate::error::{AuthError, AuthResult};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Bounded, offloaded credential hashing
#[derive(Clone)]
pub struct CredentialHasher {
    permits: Arc<Semaphore>,
    pepper: Option<Vec<u8>>,
}

impl CredentialHasher {
    pub fn new(max_concurrent: usize, pepper: Option<Vec<u8>>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            pepper,
        }
    }

    /// Hash a password into a persistable credential
    pub async fn hash(&self, password: RawPassword) -> AuthResult<Credential> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AuthError::Internal("hashing semaphore closed".to_string()))?;

        let pepper = self.pepper.clone();
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            password.into_credential(pepper.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?;

        result
    }

    /// Verify a password against a stored credential
    pub async fn verify(&self, password: RawPassword, credential: Credential) -> AuthResult<bool> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AuthError::Internal("hashing semaphore closed".to_string()))?;

        let pepper = self.pepper.clone();
        let matched = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            credential.matches(&password, pepper.as_deref())
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?;

        Ok(matched)
    }
}
