//! Principal Entity
//!
//! An account that can authenticate. Carries the employee profile captured
//! at registration plus the stored credential.

use crate::domain::value_object::{credential::Credential, email::Email, role::Role};
use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::PrincipalId;

/// Employee profile captured when an admin registers an account
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub department: Option<String>,
    pub skills: Vec<String>,
    pub designation: Option<String>,
}

/// Authenticatable account
#[derive(Debug, Clone)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub email: Email,
    pub credential: Credential,
    pub role: Role,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Create a new principal with a fresh id
    pub fn new(email: Email, credential: Credential, role: Role, profile: Profile) -> Self {
        Self {
            principal_id: PrincipalId::new(),
            email,
            credential,
            role,
            profile,
            created_at: Utc::now(),
        }
    }

    /// Replace the stored credential (password recovery)
    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }
}
