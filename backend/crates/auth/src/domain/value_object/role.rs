//! Role Value Object
//!
//! Access roles are a closed set. Every role carries an explicit post-login
//! destination; there is no default arm that silently grants a broader route.

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};

/// Access role assigned to a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    ProjectManager,
    AccountsManager,
    Admin,
}

impl Role {
    /// Stable code used for storage and wire representation
    pub fn as_code(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::ProjectManager => "project_manager",
            Role::AccountsManager => "accounts_manager",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role code
    ///
    /// A code outside the closed set is a data error, not a panic.
    pub fn from_code(code: &str) -> AuthResult<Self> {
        match code {
            "employee" => Ok(Role::Employee),
            "project_manager" => Ok(Role::ProjectManager),
            "accounts_manager" => Ok(Role::AccountsManager),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }

    /// Map a free-text job designation onto a role
    ///
    /// Only the two manager designations are privileged; anything else is a
    /// plain employee. Admin accounts are provisioned directly and never
    /// minted from a designation.
    pub fn from_designation(designation: &str) -> Self {
        match designation.trim() {
            "Project Manager" => Role::ProjectManager,
            "Accounts Manager" => Role::AccountsManager,
            _ => Role::Employee,
        }
    }

    /// Dashboard path a principal with this role lands on after sign-in
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::ProjectManager | Role::AccountsManager => "/manager/",
            Role::Employee => "/employee/",
            Role::Admin => "/admin/",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}
