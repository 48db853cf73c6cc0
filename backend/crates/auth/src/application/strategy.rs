//! Authentication Strategies
//!
//! Every way to establish "who is this" runs through a named strategy that
//! returns a tagged verdict. Callers match on the verdict; there is no
//! ambiguous half-failed state and no callback plumbing.
//!
//! Two strategies are registered by default:
//! - `signin`: verifies an email/password pair against the stored credential
//! - `add-employee`: registers a new account and authenticates it in one step

use crate::application::hasher::CredentialHasher;
use crate::domain::entity::principal::{Principal, Profile};
use crate::domain::repository::PrincipalRepository;
use crate::domain::value_object::{credential::RawPassword, email::Email, role::Role};
use crate::error::AuthError;
use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry name of the email/password sign-in strategy
pub const SIGN_IN: &str = "signin";

/// Registry name of the admin-driven employee registration strategy
pub const ADD_EMPLOYEE: &str = "add-employee";

// ============================================================================
// Verdicts
// ============================================================================

/// Why an attempt was turned away
///
/// Rejections are expected outcomes with user-facing messages. They are
/// distinct from `Verdict::Errored`, which is an infrastructure failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Input failed shape validation before any store access
    Validation(Cow<'static, str>),
    /// Unknown email or wrong password. One variant, one message, so the
    /// response cannot be used to probe which accounts exist.
    Credentials,
    /// Registration attempted with an email that already has an account
    DuplicateEmail,
}

impl Rejection {
    /// User-facing rejection message
    pub fn message(&self) -> &str {
        match self {
            Rejection::Validation(message) => message,
            Rejection::Credentials => "Incorrect email or password",
            Rejection::DuplicateEmail => "Email is already in use",
        }
    }
}

impl From<Rejection> for AuthError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Validation(message) => AuthError::Validation(message.into_owned()),
            Rejection::Credentials => AuthError::InvalidCredentials,
            Rejection::DuplicateEmail => AuthError::EmailTaken,
        }
    }
}

/// Outcome of running a strategy
#[derive(Debug)]
pub enum Verdict {
    /// The attempt established a principal
    Authenticated(Principal),
    /// The attempt was turned away for an expected reason
    Rejected(Rejection),
    /// Infrastructure failed; nothing can be said about the attempt
    Errored(AuthError),
}

// ============================================================================
// Attempts
// ============================================================================

/// Email/password pair submitted at sign-in
#[derive(Debug)]
pub struct SignInAttempt {
    pub email: String,
    pub password: String,
}

/// Registration form submitted by an admin
#[derive(Debug)]
pub struct EmployeeForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub department: Option<String>,
    pub skills: Vec<String>,
    pub designation: String,
}

/// Input to a strategy, one variant per registered strategy
#[derive(Debug)]
pub enum AuthAttempt {
    SignIn(SignInAttempt),
    AddEmployee(EmployeeForm),
}

// ============================================================================
// Sign-in strategy
// ============================================================================

/// Verifies an email/password pair against the stored credential
pub struct SignInStrategy<R> {
    repo: Arc<R>,
    hasher: CredentialHasher,
}

impl<R: PrincipalRepository + Sync> SignInStrategy<R> {
    pub fn new(repo: Arc<R>, hasher: CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn authenticate(&self, attempt: SignInAttempt) -> Verdict {
        // Shape validation first; malformed input never touches the store
        let Ok(email) = Email::new(attempt.email) else {
            return Verdict::Rejected(Rejection::Validation(Cow::Borrowed("Invalid email")));
        };
        let Ok(password) = RawPassword::new(attempt.password) else {
            return Verdict::Rejected(Rejection::Validation(Cow::Borrowed("Invalid password")));
        };

        let principal = match self.repo.find_by_email(&email).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return Verdict::Rejected(Rejection::Credentials),
            Err(e) => return Verdict::Errored(e),
        };

        match self
            .hasher
            .verify(password, principal.credential.clone())
            .await
        {
            Ok(true) => Verdict::Authenticated(principal),
            Ok(false) => Verdict::Rejected(Rejection::Credentials),
            Err(e) => Verdict::Errored(e),
        }
    }
}

// ============================================================================
// Add-employee strategy
// ============================================================================

/// Registers a new employee account
///
/// The role is derived from the job designation; the admin never supplies a
/// role directly. Uniqueness is pre-checked for a friendly rejection, but
/// the storage unique constraint is what decides races.
pub struct AddEmployeeStrategy<R> {
    repo: Arc<R>,
    hasher: CredentialHasher,
}

impl<R: PrincipalRepository + Sync> AddEmployeeStrategy<R> {
    pub fn new(repo: Arc<R>, hasher: CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn authenticate(&self, form: EmployeeForm) -> Verdict {
        let email = match Email::new(form.email) {
            Ok(email) => email,
            Err(e) => {
                return Verdict::Rejected(Rejection::Validation(Cow::Owned(
                    e.message().to_string(),
                )));
            }
        };

        if form.name.trim().is_empty() {
            return Verdict::Rejected(Rejection::Validation(Cow::Borrowed("Name cannot be empty")));
        }

        let password = match RawPassword::new(form.password) {
            Ok(password) => password,
            Err(e) => return Verdict::Rejected(Rejection::Validation(Cow::Owned(e.to_string()))),
        };

        match self.repo.exists_by_email(&email).await {
            Ok(true) => return Verdict::Rejected(Rejection::DuplicateEmail),
            Ok(false) => {}
            Err(e) => return Verdict::Errored(e),
        }

        let credential = match self.hasher.hash(password).await {
            Ok(credential) => credential,
            Err(e) => return Verdict::Errored(e),
        };

        let role = Role::from_designation(&form.designation);
        let profile = Profile {
            name: form.name,
            date_of_birth: form.date_of_birth,
            contact_number: form.contact_number,
            department: form.department,
            skills: form.skills,
            designation: Some(form.designation),
        };
        let principal = Principal::new(email, credential, role, profile);

        match self.repo.create_principal(&principal).await {
            Ok(()) => Verdict::Authenticated(principal),
            // Lost the race after the pre-check; same rejection either way
            Err(AuthError::EmailTaken) => Verdict::Rejected(Rejection::DuplicateEmail),
            Err(e) => Verdict::Errored(e),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// A registered strategy
///
/// An enum rather than trait objects: the async repository traits are not
/// dyn-compatible, and the strategy set is closed anyway.
pub enum Strategy<R> {
    SignIn(SignInStrategy<R>),
    AddEmployee(AddEmployeeStrategy<R>),
}

impl<R: PrincipalRepository + Sync> Strategy<R> {
    /// Run the strategy against an attempt
    ///
    /// Handing a strategy the wrong attempt shape is a wiring bug, reported
    /// as an error rather than a rejection.
    pub async fn authenticate(&self, attempt: AuthAttempt) -> Verdict {
        match (self, attempt) {
            (Strategy::SignIn(strategy), AuthAttempt::SignIn(attempt)) => {
                strategy.authenticate(attempt).await
            }
            (Strategy::AddEmployee(strategy), AuthAttempt::AddEmployee(form)) => {
                strategy.authenticate(form).await
            }
            _ => Verdict::Errored(AuthError::Internal(
                "attempt shape does not match strategy".to_string(),
            )),
        }
    }
}

/// Explicit, injectable strategy lookup
///
/// Strategies are registered under stable names and resolved by name at the
/// call site. Nothing global, nothing mutated after construction.
pub struct StrategyRegistry<R> {
    entries: HashMap<&'static str, Strategy<R>>,
}

impl<R: PrincipalRepository + Sync> StrategyRegistry<R> {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with the two standard strategies installed
    pub fn standard(repo: Arc<R>, hasher: CredentialHasher) -> Self {
        let mut registry = Self::new();
        registry.register(
            SIGN_IN,
            Strategy::SignIn(SignInStrategy::new(repo.clone(), hasher.clone())),
        );
        registry.register(
            ADD_EMPLOYEE,
            Strategy::AddEmployee(AddEmployeeStrategy::new(repo, hasher)),
        );
        registry
    }

    pub fn register(&mut self, name: &'static str, strategy: Strategy<R>) {
        self.entries.insert(name, strategy);
    }

    pub fn get(&self, name: &str) -> Option<&Strategy<R>> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}

impl<R: PrincipalRepository + Sync> Default for StrategyRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
