//! HTTP Middleware

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::cookie::extract_cookie;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
use crate::application::csrf;
use crate::domain::repository::{NotificationSender, PrincipalRepository, SessionRepository};
use crate::error::AuthError;
use crate::presentation::handlers::{AuthAppState, session_token};

fn csrf_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(CSRF_HEADER_NAME)?.to_str().ok()
}

/// Double-submit CSRF guard for state-changing routes
///
/// The cookie copy and the header copy must both match the token stored in
/// the caller's server-side session. Failure short-circuits before the
/// handler runs, so a rejected request has no side effects.
pub async fn require_csrf<R, N>(
    State(state): State<AuthAppState<R, N>>,
    request: Request,
    next: Next,
) -> Response
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let headers = request.headers();

    // No session means no anchored token; fail closed
    let Some(token) = session_token(headers) else {
        return AuthError::CsrfMismatch.into_response();
    };

    let check = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );
    let session = match check.load_session(&token).await {
        Ok(session) => session,
        Err(AuthError::SessionInvalid) => return AuthError::CsrfMismatch.into_response(),
        Err(e) => return e.into_response(),
    };

    let cookie_token = extract_cookie(headers, CSRF_COOKIE_NAME);
    let header_token = csrf_header(headers).map(str::to_string);

    if let Err(e) = csrf::verify(
        cookie_token.as_deref(),
        header_token.as_deref(),
        &session.csrf_token,
    ) {
        return e.into_response();
    }

    next.run(request).await
}
