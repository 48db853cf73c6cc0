//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository ports
//! - `application/` - Use cases, strategies, session/CSRF services
//! - `infra/` - Postgres, SMTP, and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Email + password sign-in through named strategies
//! - Admin-driven employee registration with designation-derived roles
//! - Server-side sessions behind HMAC-signed cookie tokens
//! - Double-submit CSRF protection on all mutations
//! - Password recovery by reset-and-mail through a delivery outbox
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, bounded by hashing admission control
//! - One rejection message for unknown email and wrong password
//! - Fresh session id on every sign-in (no fixation)
//! - Roles are a closed set; the post-login route is exhaustive

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use infra::smtp::SmtpSender;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
