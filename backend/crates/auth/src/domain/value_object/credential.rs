//! Credential Value Objects
//!
//! Domain wrappers over the platform password primitives. `RawPassword`
//! exists only between request parsing and hashing; `Credential` is the
//! persistable form.

use crate::error::{AuthError, AuthResult};
use platform::password::{ClearTextPassword, HashedPassword};

/// Plaintext password in transit, zeroized on drop
#[derive(Debug)]
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate and wrap a submitted password
    pub fn new(raw: String) -> AuthResult<Self> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    /// Generate a fresh random password for recovery
    pub fn generate() -> Self {
        Self(ClearTextPassword::generate())
    }

    /// Expose the plaintext for one-shot delivery. Never log or persist.
    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    /// Hash into a persistable credential
    pub fn into_credential(self, pepper: Option<&[u8]>) -> AuthResult<Credential> {
        Ok(Credential(self.0.hash(pepper)?))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

/// Stored credential (Argon2id PHC string)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(HashedPassword);

impl Credential {
    /// Restore from a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> AuthResult<Self> {
        Ok(Self(HashedPassword::from_phc_string(s)?))
    }

    /// PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a submitted password against this credential
    pub fn matches(&self, password: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(password.inner(), pepper)
    }
}
