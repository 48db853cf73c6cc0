//! Add-Employee Use Case
//!
//! Thin wrapper over the `add-employee` strategy. The admin check happens
//! at the HTTP layer; by the time this runs the caller is known to be an
//! admin.

use crate::application::strategy::{AuthAttempt, EmployeeForm, StrategyRegistry, Verdict, ADD_EMPLOYEE};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::PrincipalRepository;
use crate::error::{AuthError, AuthResult};
use std::sync::Arc;

/// Employee registration use case
pub struct AddEmployeeUseCase<R> {
    registry: Arc<StrategyRegistry<R>>,
}

impl<R: PrincipalRepository + Sync> AddEmployeeUseCase<R> {
    pub fn new(registry: Arc<StrategyRegistry<R>>) -> Self {
        Self { registry }
    }

    /// Register a new employee account
    pub async fn execute(&self, form: EmployeeForm) -> AuthResult<Principal> {
        let strategy = self.registry.get(ADD_EMPLOYEE).ok_or_else(|| {
            AuthError::Internal("add-employee strategy not registered".to_string())
        })?;

        match strategy.authenticate(AuthAttempt::AddEmployee(form)).await {
            Verdict::Authenticated(principal) => {
                tracing::info!(
                    principal_id = %principal.principal_id,
                    role = %principal.role,
                    "Employee account created"
                );
                Ok(principal)
            }
            Verdict::Rejected(rejection) => Err(rejection.into()),
            Verdict::Errored(e) => Err(e),
        }
    }
}
