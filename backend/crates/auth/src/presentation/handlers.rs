//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use platform::cookie::{self, CookieConfig};

use crate::application::add_employee::AddEmployeeUseCase;
use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::{
    AuthConfig, CSRF_COOKIE_NAME, SESSION_COOKIE_NAME,
};
use crate::application::csrf;
use crate::application::hasher::CredentialHasher;
use crate::application::outbox::DeliveryOutbox;
use crate::application::recovery::PasswordRecoveryUseCase;
use crate::application::sign_in::{SignInOutcome, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::strategy::{EmployeeForm, SignInAttempt, StrategyRegistry};
use crate::application::token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{NotificationSender, PrincipalRepository, SessionRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AddEmployeeRequest, AddEmployeeResponse, CsrfTokenResponse, ForgotPasswordRequest,
    ForgotPasswordResponse, MessagesResponse, SessionStatusResponse, SignInRequest,
    SignInResponse,
};
use kernel::id::SessionId;

/// Shared state for auth handlers
pub struct AuthAppState<R, N>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub registry: Arc<StrategyRegistry<R>>,
    pub hasher: CredentialHasher,
    pub outbox: Arc<DeliveryOutbox<N>>,
    pub config: Arc<AuthConfig>,
}

impl<R, N> Clone for AuthAppState<R, N>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            registry: self.registry.clone(),
            hasher: self.hasher.clone(),
            outbox: self.outbox.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Cookie helpers
// ============================================================================

fn session_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: SESSION_COOKIE_NAME.to_string(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}

fn csrf_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: CSRF_COOKIE_NAME.to_string(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}

/// Session token from the request cookies, if any
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie::extract_cookie(headers, SESSION_COOKIE_NAME)
}

/// Session id the caller already holds, if the token verifies
fn prior_session_id(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionId> {
    let token = session_token(headers)?;
    token::parse_session_token(&config.session_secret, &token).ok()
}

// ============================================================================
// CSRF token issuance
// ============================================================================

/// GET /api/auth/csrf-token
///
/// Returns the caller's CSRF token, creating an anonymous session to hold
/// it when none exists yet. The token also travels as a cookie so the
/// double-submit pair can be checked on mutations.
pub async fn csrf_token<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let check = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    // Reuse a live session's token; otherwise mint an anonymous session
    if let Some(existing_token) = session_token(&headers) {
        if let Ok(session) = check.load_session(&existing_token).await {
            let csrf_cookie =
                csrf_cookie_config(&state.config).build_set_cookie(&session.csrf_token);
            return Ok((
                StatusCode::OK,
                AppendHeaders([(header::SET_COOKIE, csrf_cookie)]),
                Json(CsrfTokenResponse {
                    csrf_token: session.csrf_token,
                }),
            )
                .into_response());
        }
    }

    let csrf_token = csrf::issue_token();
    let session = Session::anonymous(csrf_token.clone(), state.config.session_ttl);
    state.repo.create_session(&session).await?;

    let session_cookie = session_cookie_config(&state.config).build_set_cookie(
        &token::sign_session_token(&state.config.session_secret, &session.session_id)?,
    );
    let csrf_cookie = csrf_cookie_config(&state.config).build_set_cookie(&csrf_token);

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, session_cookie),
            (header::SET_COOKIE, csrf_cookie),
        ]),
        Json(CsrfTokenResponse { csrf_token }),
    )
        .into_response())
}

// ============================================================================
// Sign in
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.registry.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let attempt = SignInAttempt {
        email: req.email,
        password: req.password,
    };
    let prior = prior_session_id(&headers, &state.config);

    match use_case.execute(attempt, prior).await? {
        SignInOutcome::Rejected(rejection) => Err(rejection.into()),
        SignInOutcome::Success {
            session_token,
            csrf_token,
            redirect_to,
        } => {
            let session_cookie =
                session_cookie_config(&state.config).build_set_cookie(&session_token);
            let csrf_cookie = csrf_cookie_config(&state.config).build_set_cookie(&csrf_token);

            Ok((
                StatusCode::OK,
                AppendHeaders([
                    (header::SET_COOKIE, session_cookie),
                    (header::SET_COOKIE, csrf_cookie),
                ]),
                Json(SignInResponse {
                    redirect_to: redirect_to.to_string(),
                }),
            ))
        }
    }
}

// ============================================================================
// Sign out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    if let Some(token) = session_token(&headers) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookies are cleared either way; a storage failure here only
        // leaves the server-side row for the expiry sweep
        if let Err(e) = use_case.execute(&token).await {
            tracing::error!(error = %e, "Failed to delete session on sign-out");
        }
    }

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (
                header::SET_COOKIE,
                session_cookie_config(&state.config).build_delete_cookie(),
            ),
            (
                header::SET_COOKIE,
                csrf_cookie_config(&state.config).build_delete_cookie(),
            ),
        ]),
    ))
}

// ============================================================================
// Session status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let token = session_token(&headers);
    let status = use_case.status(token.as_deref()).await?;

    Ok(Json(SessionStatusResponse {
        authenticated: status.authenticated,
        email: status.email,
        role: status.role,
        expires_at_ms: status.expires_at_ms,
    }))
}

// ============================================================================
// Flash messages
// ============================================================================

/// GET /api/auth/messages
///
/// Drains the session's one-shot message queue. An anonymous caller simply
/// gets an empty list.
pub async fn messages<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
) -> AuthResult<Json<MessagesResponse>>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let check = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let Some(token) = session_token(&headers) else {
        return Ok(Json(MessagesResponse { messages: vec![] }));
    };

    let mut session = match check.load_session(&token).await {
        Ok(session) => session,
        Err(AuthError::SessionInvalid) => {
            return Ok(Json(MessagesResponse { messages: vec![] }));
        }
        Err(e) => return Err(e),
    };

    let messages = session.take_flash();
    if !messages.is_empty() {
        state.repo.update_session(&session).await?;
    }

    Ok(Json(MessagesResponse { messages }))
}

// ============================================================================
// Add employee
// ============================================================================

/// POST /api/auth/employees
///
/// Admin-only registration of a new employee account.
pub async fn add_employee<R, N>(
    State(state): State<AuthAppState<R, N>>,
    headers: HeaderMap,
    Json(req): Json<AddEmployeeRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let check = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let token = session_token(&headers).ok_or(AuthError::SessionInvalid)?;
    let (_, caller) = check.current_principal(&token).await?;
    if !caller.role.is_admin() {
        return Err(AuthError::NotAuthorized);
    }

    let use_case = AddEmployeeUseCase::new(state.registry.clone());
    let principal = use_case
        .execute(EmployeeForm {
            email: req.email,
            password: req.password,
            name: req.name,
            date_of_birth: req.date_of_birth,
            contact_number: req.contact_number,
            department: req.department,
            skills: req.skills,
            designation: req.designation,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddEmployeeResponse {
            principal_id: principal.principal_id.into_uuid(),
            email: principal.email.as_str().to_string(),
            role: principal.role,
        }),
    ))
}

// ============================================================================
// Password recovery
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<ForgotPasswordResponse>>
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let use_case = PasswordRecoveryUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.outbox.clone(),
    );

    let message = use_case.execute(req.email).await?;

    Ok(Json(ForgotPasswordResponse {
        message: message.to_string(),
    }))
}
