//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::hasher::CredentialHasher;
use crate::application::outbox::DeliveryOutbox;
use crate::application::strategy::StrategyRegistry;
use crate::domain::repository::{NotificationSender, PrincipalRepository, SessionRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::infra::smtp::SmtpSender;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_csrf;

/// Create the auth router with the PostgreSQL repository and SMTP delivery
pub fn auth_router(repo: PgAuthRepository, sender: SmtpSender, config: AuthConfig) -> Router {
    auth_router_generic(repo, sender, config)
}

/// Create a generic auth router for any repository and sender implementation
pub fn auth_router_generic<R, N>(repo: R, sender: N, config: AuthConfig) -> Router
where
    R: PrincipalRepository + SessionRepository + Send + Sync + 'static,
    N: NotificationSender + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let hasher = CredentialHasher::new(
        config.max_concurrent_hashes,
        config.password_pepper.clone(),
    );
    let registry = Arc::new(StrategyRegistry::standard(repo.clone(), hasher.clone()));
    let outbox = Arc::new(DeliveryOutbox::new(Arc::new(sender)));

    let state = AuthAppState {
        repo,
        registry,
        hasher,
        outbox,
        config: Arc::new(config),
    };

    // Mutations sit behind the double-submit guard
    let guarded = Router::new()
        .route("/signin", post(handlers::sign_in::<R, N>))
        .route("/employees", post(handlers::add_employee::<R, N>))
        .route("/forgot-password", post(handlers::forgot_password::<R, N>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_csrf::<R, N>,
        ));

    Router::new()
        .route("/csrf-token", get(handlers::csrf_token::<R, N>))
        .route("/signout", post(handlers::sign_out::<R, N>))
        .route("/status", get(handlers::session_status::<R, N>))
        .route("/messages", get(handlers::messages::<R, N>))
        .merge(guarded)
        .with_state(state)
}
