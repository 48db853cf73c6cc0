//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Sign-in rejected. One message for unknown email and wrong password
    /// so responses do not reveal which accounts exist.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Session token missing, malformed, expired, or not backed by a record
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Double-submit CSRF check failed
    #[error("Invalid or missing CSRF token")]
    CsrfMismatch,

    /// Caller is authenticated but lacks the required role
    #[error("You are not authorized to perform this action")]
    NotAuthorized,

    /// Recovery requested for an email with no account
    #[error("No account found with this email.")]
    AccountNotFound,

    /// Registration with an email that already has an account
    #[error("Email is already in use")]
    EmailTaken,

    /// A stored role code that no variant covers
    #[error("Unknown role code: {0}")]
    UnknownRole(String),

    /// Credential was persisted but the notification could not be delivered
    #[error("Account updated but notification delivery failed")]
    Delivery(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::CsrfMismatch | AuthError::NotAuthorized => StatusCode::FORBIDDEN,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::Delivery(_) => StatusCode::BAD_GATEWAY,
            AuthError::UnknownRole(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::CsrfMismatch | AuthError::NotAuthorized => ErrorKind::Forbidden,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Delivery(_) => ErrorKind::BadGateway,
            AuthError::UnknownRole(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures surface generically; the diagnostic detail
    /// stays in the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::UnknownRole(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::UnknownRole(code) => {
                tracing::error!(code = %code, "Stored role code not recognized");
            }
            AuthError::Delivery(detail) => {
                tracing::error!(detail = %detail, "Notification delivery failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::CsrfMismatch => {
                tracing::warn!("CSRF token mismatch detected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::CsrfMismatch.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::AccountNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Delivery("smtp down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_credential_rejections_share_one_message() {
        // Unknown account and wrong password must be indistinguishable
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }

    #[test]
    fn test_server_failures_surface_generically() {
        let err = AuthError::Internal("pool exhausted on node 3".to_string());
        let app = err.to_app_error();
        assert_eq!(app.message(), "Internal server error");
    }

    #[test]
    fn test_app_error_roundtrip_keeps_validation_kind() {
        let app = AppError::bad_request("Email cannot be empty");
        let auth: AuthError = app.into();
        assert!(matches!(auth, AuthError::Validation(_)));
        assert_eq!(auth.kind(), ErrorKind::BadRequest);
    }
}
