//! CSRF Guard
//!
//! Double-submit check: the client obtains the CSRF token from the
//! token-issuance response body and echoes it in a request header, while
//! the browser carries the same token in an HttpOnly cookie. Both must
//! match the token stored in the server-side session. All comparisons are
//! constant time.

use crate::error::{AuthError, AuthResult};
use platform::crypto;

/// Random bytes behind an issued CSRF token
pub const CSRF_TOKEN_BYTES: usize = 32;

/// Issue a fresh CSRF token
pub fn issue_token() -> String {
    crypto::random_token(CSRF_TOKEN_BYTES)
}

/// Verify the double-submit pair against the session's stored token
///
/// Fails closed: a missing cookie, missing header, or any mismatch is a
/// `CsrfMismatch`, and the caller must produce no side effects.
pub fn verify(
    cookie_token: Option<&str>,
    header_token: Option<&str>,
    session_token: &str,
) -> AuthResult<()> {
    let cookie = cookie_token.ok_or(AuthError::CsrfMismatch)?;
    let header = header_token.ok_or(AuthError::CsrfMismatch)?;

    if !crypto::constant_time_eq(cookie.as_bytes(), session_token.as_bytes()) {
        return Err(AuthError::CsrfMismatch);
    }
    if !crypto::constant_time_eq(header.as_bytes(), session_token.as_bytes()) {
        return Err(AuthError::CsrfMismatch);
    }

    Ok(())
}
