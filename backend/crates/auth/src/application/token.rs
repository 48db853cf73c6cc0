//! Signed Session Tokens
//!
//! The cookie value is `<session-uuid>.<base64url hmac>`. The HMAC covers
//! the uuid text, so a client cannot mint or swap session ids. Anything
//! that fails to parse or verify is simply an invalid session.

use crate::error::{AuthError, AuthResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use kernel::id::SessionId;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Sign a session id into a cookie-safe token
pub fn sign_session_token(secret: &[u8; 32], session_id: &SessionId) -> AuthResult<String> {
    let id_text = session_id.to_string();

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("HMAC key setup failed: {e}")))?;
    mac.update(id_text.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{id_text}.{signature}"))
}

/// Parse and verify a session token
///
/// Signature comparison happens inside `Mac::verify_slice`, which is
/// constant time.
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> AuthResult<SessionId> {
    let (id_text, signature) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let uuid = Uuid::parse_str(id_text).map_err(|_| AuthError::SessionInvalid)?;

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("HMAC key setup failed: {e}")))?;
    mac.update(id_text.as_bytes());
    mac.verify_slice(&signature_bytes)
        .map_err(|_| AuthError::SessionInvalid)?;

    Ok(SessionId::from_uuid(uuid))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_sign_and_parse_roundtrip() {
        let session_id = SessionId::new();
        let token = sign_session_token(&SECRET, &session_id).unwrap();
        let parsed = parse_session_token(&SECRET, &token).unwrap();
        assert_eq!(parsed, session_id);
    }

    #[test]
    fn test_tampered_id_rejected() {
        let session_id = SessionId::new();
        let token = sign_session_token(&SECRET, &session_id).unwrap();

        let other_id = SessionId::new().to_string();
        let signature = token.split_once('.').unwrap().1;
        let forged = format!("{other_id}.{signature}");

        assert!(matches!(
            parse_session_token(&SECRET, &forged),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session_id = SessionId::new();
        let token = sign_session_token(&SECRET, &session_id).unwrap();
        assert!(parse_session_token(&[9u8; 32], &token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_session_token(&SECRET, "").is_err());
        assert!(parse_session_token(&SECRET, "no-dot-here").is_err());
        assert!(parse_session_token(&SECRET, "not-a-uuid.c2ln").is_err());
    }
}
