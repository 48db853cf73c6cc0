//! Use-case and router tests for the auth crate

mod support {
    use crate::application::config::AuthConfig;
    use crate::application::hasher::CredentialHasher;
    use crate::application::outbox::DeliveryOutbox;
    use crate::application::strategy::StrategyRegistry;
    use crate::domain::entity::principal::{Principal, Profile};
    use crate::domain::repository::PrincipalRepository;
    use crate::domain::value_object::{credential::RawPassword, email::Email, role::Role};
    use crate::infra::memory::{InMemoryAuthRepository, MemorySender};
    use chrono::NaiveDate;
    use std::sync::Arc;

    pub struct TestEnv {
        pub repo: Arc<InMemoryAuthRepository>,
        pub registry: Arc<StrategyRegistry<InMemoryAuthRepository>>,
        pub hasher: CredentialHasher,
        pub sender: Arc<MemorySender>,
        pub outbox: Arc<DeliveryOutbox<MemorySender>>,
        pub config: Arc<AuthConfig>,
    }

    pub fn env() -> TestEnv {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let hasher = CredentialHasher::new(2, None);
        let registry = Arc::new(StrategyRegistry::standard(repo.clone(), hasher.clone()));
        let sender = Arc::new(MemorySender::new());
        let outbox = Arc::new(DeliveryOutbox::new(sender.clone()));
        let config = Arc::new(AuthConfig::development());

        TestEnv {
            repo,
            registry,
            hasher,
            sender,
            outbox,
            config,
        }
    }

    pub fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            contact_number: "5550001111".to_string(),
            department: Some("Engineering".to_string()),
            skills: vec!["rust".to_string()],
            designation: Some("Software Engineer".to_string()),
        }
    }

    pub async fn seed_account(
        env: &TestEnv,
        email: &str,
        password: &str,
        role: Role,
    ) -> Principal {
        let credential = env
            .hasher
            .hash(RawPassword::new(password.to_string()).unwrap())
            .await
            .unwrap();
        let principal = Principal::new(
            Email::new(email).unwrap(),
            credential,
            role,
            profile("Seeded Account"),
        );
        env.repo.create_principal(&principal).await.unwrap();
        principal
    }
}

mod sign_in_tests {
    use super::support::{env, seed_account};
    use crate::application::check_session::CheckSessionUseCase;
    use crate::application::csrf;
    use crate::application::sign_in::{SignInOutcome, SignInUseCase};
    use crate::application::strategy::{Rejection, SignInAttempt};
    use crate::application::token;
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;
    use crate::domain::value_object::role::Role;

    fn attempt(email: &str, password: &str) -> SignInAttempt {
        SignInAttempt {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn success_issues_session_and_role_redirect() {
        let env = env();
        seed_account(&env, "pm@example.com", "correct-horse", Role::ProjectManager).await;

        let use_case =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let outcome = use_case
            .execute(attempt("pm@example.com", "correct-horse"), None)
            .await
            .unwrap();

        match outcome {
            SignInOutcome::Success {
                session_token,
                redirect_to,
                ..
            } => {
                assert_eq!(redirect_to, "/manager/");
                let session_id =
                    token::parse_session_token(&env.config.session_secret, &session_token)
                        .unwrap();
                let session = env.repo.find_session(&session_id).await.unwrap().unwrap();
                assert!(session.is_authenticated());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_reject_identically() {
        let env = env();
        seed_account(&env, "known@example.com", "correct-horse", Role::Employee).await;

        let use_case =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());

        let unknown = use_case
            .execute(attempt("ghost@example.com", "correct-horse"), None)
            .await
            .unwrap();
        let wrong = use_case
            .execute(attempt("known@example.com", "wrong-password"), None)
            .await
            .unwrap();

        let (SignInOutcome::Rejected(a), SignInOutcome::Rejected(b)) = (unknown, wrong) else {
            panic!("expected rejections");
        };
        assert_eq!(a, b);
        assert_eq!(a.message(), "Incorrect email or password");
    }

    #[tokio::test]
    async fn rejection_queues_flash_on_prior_session() {
        let env = env();
        seed_account(&env, "known@example.com", "correct-horse", Role::Employee).await;

        let prior = Session::anonymous(csrf::issue_token(), env.config.session_ttl);
        env.repo.create_session(&prior).await.unwrap();

        let use_case =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let outcome = use_case
            .execute(
                attempt("known@example.com", "wrong-password"),
                Some(prior.session_id),
            )
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            SignInOutcome::Rejected(Rejection::Credentials)
        ));

        let mut stored = env
            .repo
            .find_session(&prior.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.take_flash(), vec!["Incorrect email or password"]);
    }

    #[tokio::test]
    async fn success_discards_prior_session() {
        let env = env();
        seed_account(&env, "known@example.com", "correct-horse", Role::Employee).await;

        let prior = Session::anonymous(csrf::issue_token(), env.config.session_ttl);
        env.repo.create_session(&prior).await.unwrap();

        let use_case =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let outcome = use_case
            .execute(
                attempt("known@example.com", "correct-horse"),
                Some(prior.session_id),
            )
            .await
            .unwrap();

        let SignInOutcome::Success { session_token, .. } = outcome else {
            panic!("expected success");
        };
        let new_id = token::parse_session_token(&env.config.session_secret, &session_token)
            .unwrap();

        assert_ne!(new_id, prior.session_id);
        assert!(
            env.repo
                .find_session(&prior.session_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn session_resolution_reflects_current_store() {
        let env = env();
        let mut principal =
            seed_account(&env, "known@example.com", "correct-horse", Role::Employee).await;

        let use_case =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let SignInOutcome::Success { session_token, .. } = use_case
            .execute(attempt("known@example.com", "correct-horse"), None)
            .await
            .unwrap()
        else {
            panic!("expected success");
        };

        // Out-of-band promotion after sign-in
        principal.role = Role::ProjectManager;
        env.repo.upsert_principal(principal);

        let check =
            CheckSessionUseCase::new(env.repo.clone(), env.repo.clone(), env.config.clone());
        let (_, current) = check.current_principal(&session_token).await.unwrap();
        assert_eq!(current.role, Role::ProjectManager);
    }
}

mod session_tests {
    use super::support::{env, seed_account};
    use crate::application::check_session::CheckSessionUseCase;
    use crate::application::csrf;
    use crate::application::sign_out::SignOutUseCase;
    use crate::application::token;
    use crate::domain::entity::session::Session;
    use crate::domain::repository::SessionRepository;
    use crate::domain::value_object::role::Role;
    use crate::error::AuthError;
    use std::time::Duration;

    #[tokio::test]
    async fn expired_session_is_deleted_on_access() {
        let env = env();
        let session = Session::anonymous(csrf::issue_token(), Duration::ZERO);
        env.repo.create_session(&session).await.unwrap();
        let token =
            token::sign_session_token(&env.config.session_secret, &session.session_id).unwrap();

        let check =
            CheckSessionUseCase::new(env.repo.clone(), env.repo.clone(), env.config.clone());
        assert!(matches!(
            check.load_session(&token).await,
            Err(AuthError::SessionInvalid)
        ));
        assert!(
            env.repo
                .find_session(&session.session_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn status_is_anonymous_without_valid_token() {
        let env = env();
        let check =
            CheckSessionUseCase::new(env.repo.clone(), env.repo.clone(), env.config.clone());

        let status = check.status(None).await.unwrap();
        assert!(!status.authenticated);

        let status = check.status(Some("garbage.token")).await.unwrap();
        assert!(!status.authenticated);
        assert!(status.email.is_none());
    }

    #[tokio::test]
    async fn removed_account_invalidates_session() {
        let env = env();
        let principal =
            seed_account(&env, "gone@example.com", "correct-horse", Role::Employee).await;

        let session = Session::for_principal(
            principal.principal_id,
            csrf::issue_token(),
            env.config.session_ttl,
        );
        env.repo.create_session(&session).await.unwrap();
        let token =
            token::sign_session_token(&env.config.session_secret, &session.session_id).unwrap();

        // Fresh repo without the principal, same session store shape
        let fresh = super::support::env();
        fresh.repo.create_session(&session).await.unwrap();
        let check = CheckSessionUseCase::new(
            fresh.repo.clone(),
            fresh.repo.clone(),
            env.config.clone(),
        );

        assert!(matches!(
            check.current_principal(&token).await,
            Err(AuthError::SessionInvalid)
        ));
        assert!(
            fresh
                .repo
                .find_session(&session.session_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn sign_out_is_idempotent() {
        let env = env();
        let session = Session::anonymous(csrf::issue_token(), env.config.session_ttl);
        env.repo.create_session(&session).await.unwrap();
        let token =
            token::sign_session_token(&env.config.session_secret, &session.session_id).unwrap();

        let use_case = SignOutUseCase::new(env.repo.clone(), env.config.clone());
        use_case.execute(&token).await.unwrap();
        assert_eq!(env.repo.session_count(), 0);

        // Second sign-out and garbage tokens are still fine
        use_case.execute(&token).await.unwrap();
        use_case.execute("not-even-a-token").await.unwrap();
    }
}

mod registration_tests {
    use super::support::{env, seed_account};
    use crate::application::add_employee::AddEmployeeUseCase;
    use crate::application::strategy::EmployeeForm;
    use crate::domain::value_object::role::Role;
    use crate::error::AuthError;
    use chrono::NaiveDate;

    fn form(email: &str, designation: &str) -> EmployeeForm {
        EmployeeForm {
            email: email.to_string(),
            password: "initial-password".to_string(),
            name: "New Hire".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 6, 1).unwrap(),
            contact_number: "5550002222".to_string(),
            department: Some("Delivery".to_string()),
            skills: vec!["planning".to_string()],
            designation: designation.to_string(),
        }
    }

    #[tokio::test]
    async fn designation_drives_role_and_redirect() {
        let env = env();
        let use_case = AddEmployeeUseCase::new(env.registry.clone());

        let pm = use_case
            .execute(form("pm@example.com", "Project Manager"))
            .await
            .unwrap();
        assert_eq!(pm.role, Role::ProjectManager);
        assert_eq!(pm.role.dashboard_path(), "/manager/");

        let dev = use_case
            .execute(form("dev@example.com", "Software Engineer"))
            .await
            .unwrap();
        assert_eq!(dev.role, Role::Employee);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let env = env();
        seed_account(&env, "taken@example.com", "correct-horse", Role::Employee).await;

        let use_case = AddEmployeeUseCase::new(env.registry.clone());
        let result = use_case.execute(form("taken@example.com", "Clerk")).await;

        assert!(matches!(result, Err(AuthError::EmailTaken)));
        assert_eq!(env.repo.principal_count(), 1);
    }

    #[tokio::test]
    async fn malformed_input_never_reaches_the_store() {
        let env = env();
        let use_case = AddEmployeeUseCase::new(env.registry.clone());

        let mut bad_email = form("not-an-email", "Clerk");
        bad_email.password = "fine-password".to_string();
        assert!(matches!(
            use_case.execute(bad_email).await,
            Err(AuthError::Validation(_))
        ));

        let mut bad_password = form("ok@example.com", "Clerk");
        bad_password.password = "abc".to_string();
        assert!(matches!(
            use_case.execute(bad_password).await,
            Err(AuthError::Validation(_))
        ));

        assert_eq!(env.repo.principal_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_duplicates_get_exactly_one_account() {
        let env = env();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let registry = env.registry.clone();
            handles.push(tokio::spawn(async move {
                AddEmployeeUseCase::new(registry)
                    .execute(form("raced@example.com", "Clerk"))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AuthError::EmailTaken) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 3);
        assert_eq!(env.repo.principal_count(), 1);
    }
}

mod recovery_tests {
    use super::support::{env, seed_account};
    use crate::application::recovery::{PasswordRecoveryUseCase, RECOVERY_SUCCESS_MESSAGE};
    use crate::application::sign_in::{SignInOutcome, SignInUseCase};
    use crate::application::strategy::SignInAttempt;
    use crate::domain::value_object::role::Role;
    use crate::error::AuthError;

    #[tokio::test]
    async fn recovery_rotates_credential_and_mails_it() {
        let env = env();
        seed_account(&env, "user@example.com", "old-password", Role::Employee).await;

        let recovery = PasswordRecoveryUseCase::new(
            env.repo.clone(),
            env.hasher.clone(),
            env.outbox.clone(),
        );
        let message = recovery.execute("user@example.com".to_string()).await.unwrap();
        assert_eq!(message, RECOVERY_SUCCESS_MESSAGE);

        let sent = env.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");

        // Mailed password is the last line of the credential block
        let new_password = sent[0]
            .body
            .lines()
            .find(|line| line.len() == 12 && line.chars().all(|c| c.is_ascii_alphanumeric()))
            .expect("mail body carries the new password")
            .to_string();

        let sign_in =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());

        let old = sign_in
            .execute(
                SignInAttempt {
                    email: "user@example.com".to_string(),
                    password: "old-password".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert!(matches!(old, SignInOutcome::Rejected(_)));

        let fresh = sign_in
            .execute(
                SignInAttempt {
                    email: "user@example.com".to_string(),
                    password: new_password,
                },
                None,
            )
            .await
            .unwrap();
        assert!(matches!(fresh, SignInOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn unknown_email_mutates_nothing() {
        let env = env();
        seed_account(&env, "user@example.com", "old-password", Role::Employee).await;

        let recovery = PasswordRecoveryUseCase::new(
            env.repo.clone(),
            env.hasher.clone(),
            env.outbox.clone(),
        );
        let result = recovery.execute("ghost@example.com".to_string()).await;
        assert!(matches!(result, Err(AuthError::AccountNotFound)));
        assert!(env.sender.sent().is_empty());

        // Old credential still works
        let sign_in =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let outcome = sign_in
            .execute(
                SignInAttempt {
                    email: "user@example.com".to_string(),
                    password: "old-password".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, SignInOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_lookup() {
        let env = env();
        let recovery = PasswordRecoveryUseCase::new(
            env.repo.clone(),
            env.hasher.clone(),
            env.outbox.clone(),
        );

        assert!(matches!(
            recovery.execute("".to_string()).await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            recovery.execute("not-an-email".to_string()).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn delivery_failure_keeps_new_credential_and_reports_it() {
        let env = env();
        seed_account(&env, "user@example.com", "old-password", Role::Employee).await;
        env.sender.fail_next("relay refused");

        let recovery = PasswordRecoveryUseCase::new(
            env.repo.clone(),
            env.hasher.clone(),
            env.outbox.clone(),
        );
        let result = recovery.execute("user@example.com".to_string()).await;
        assert!(matches!(result, Err(AuthError::Delivery(_))));
        assert_eq!(env.outbox.pending_count().await, 1);

        // The mutation already committed; the old password is dead
        let sign_in =
            SignInUseCase::new(env.registry.clone(), env.repo.clone(), env.config.clone());
        let outcome = sign_in
            .execute(
                SignInAttempt {
                    email: "user@example.com".to_string(),
                    password: "old-password".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert!(matches!(outcome, SignInOutcome::Rejected(_)));
    }
}

mod router_tests {
    use super::support::profile;
    use crate::application::config::AuthConfig;
    use crate::application::hasher::CredentialHasher;
    use crate::domain::entity::principal::Principal;
    use crate::domain::repository::PrincipalRepository;
    use crate::domain::value_object::{credential::RawPassword, email::Email, role::Role};
    use crate::infra::memory::{InMemoryAuthRepository, MemorySender};
    use crate::presentation::router::auth_router_generic;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct TestApp {
        app: Router,
        repo: InMemoryAuthRepository,
        sender: MemorySender,
    }

    async fn test_app() -> TestApp {
        let repo = InMemoryAuthRepository::new();
        let sender = MemorySender::new();
        let app = auth_router_generic(repo.clone(), sender.clone(), AuthConfig::development());
        TestApp { app, repo, sender }
    }

    async fn seed(repo: &InMemoryAuthRepository, email: &str, password: &str, role: Role) {
        let credential = CredentialHasher::new(2, None)
            .hash(RawPassword::new(password.to_string()).unwrap())
            .await
            .unwrap();
        let principal = Principal::new(
            Email::new(email).unwrap(),
            credential,
            role,
            profile("Seeded Account"),
        );
        repo.create_principal(&principal).await.unwrap();
    }

    fn set_cookies(response: &axum::response::Response) -> HashMap<String, String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// GET /csrf-token and return (cookie header value, csrf token)
    async fn bootstrap_csrf(app: &Router) -> (String, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/csrf-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        let cookie_header = format!(
            "hrms_session={}; XSRF-TOKEN={}",
            cookies["hrms_session"], cookies["XSRF-TOKEN"]
        );
        let body = body_json(response).await;
        let csrf = body["csrfToken"].as_str().unwrap().to_string();
        (cookie_header, csrf)
    }

    #[tokio::test]
    async fn csrf_token_endpoint_sets_both_cookies() {
        let t = test_app().await;
        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/csrf-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies = set_cookies(&response);
        assert!(cookies.contains_key("hrms_session"));
        assert!(cookies.contains_key("XSRF-TOKEN"));
        assert_eq!(t.repo.session_count(), 1);
    }

    #[tokio::test]
    async fn sign_in_requires_csrf_header() {
        let t = test_app().await;
        seed(&t.repo, "admin@example.com", "admin-password", Role::Admin).await;
        let (cookie_header, _csrf) = bootstrap_csrf(&t.app).await;

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signin")
                    .header(header::COOKIE, &cookie_header)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "admin@example.com", "password": "admin-password"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        // Only the anonymous bootstrap session exists; the guard blocked
        // the handler before it could touch anything
        assert_eq!(t.repo.session_count(), 1);
    }

    #[tokio::test]
    async fn full_sign_in_flow_redirects_by_role() {
        let t = test_app().await;
        seed(&t.repo, "admin@example.com", "admin-password", Role::Admin).await;
        let (cookie_header, csrf) = bootstrap_csrf(&t.app).await;

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signin")
                    .header(header::COOKIE, &cookie_header)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "admin@example.com", "password": "admin-password"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let new_cookies = set_cookies(&response);
        assert!(new_cookies.contains_key("hrms_session"));
        let body = body_json(response).await;
        assert_eq!(body["redirectTo"], "/admin/");
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_flash_message() {
        let t = test_app().await;
        seed(&t.repo, "user@example.com", "real-password", Role::Employee).await;
        let (cookie_header, csrf) = bootstrap_csrf(&t.app).await;

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signin")
                    .header(header::COOKIE, &cookie_header)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "user@example.com", "password": "wrong-password"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/messages")
                    .header(header::COOKIE, &cookie_header)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["messages"][0], "Incorrect email or password");

        // Drained on read
        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/messages")
                    .header(header::COOKIE, &cookie_header)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn add_employee_is_admin_only() {
        let t = test_app().await;
        seed(&t.repo, "emp@example.com", "emp-password", Role::Employee).await;
        let (cookie_header, csrf) = bootstrap_csrf(&t.app).await;

        // Sign in as plain employee
        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signin")
                    .header(header::COOKIE, &cookie_header)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "emp@example.com", "password": "emp-password"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let cookies = set_cookies(&response);
        let auth_cookie = format!(
            "hrms_session={}; XSRF-TOKEN={}",
            cookies["hrms_session"], cookies["XSRF-TOKEN"]
        );
        let csrf = cookies["XSRF-TOKEN"].clone();

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header(header::COOKIE, &auth_cookie)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "email": "new@example.com",
                            "password": "new-password",
                            "name": "New Hire",
                            "dateOfBirth": "1995-06-01",
                            "contactNumber": "5550002222",
                            "designation": "Clerk"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(t.repo.principal_count(), 1);
    }

    #[tokio::test]
    async fn forgot_password_unknown_email_is_404_and_sends_nothing() {
        let t = test_app().await;
        let (cookie_header, csrf) = bootstrap_csrf(&t.app).await;

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/forgot-password")
                    .header(header::COOKIE, &cookie_header)
                    .header("x-csrf-token", &csrf)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"email": "ghost@example.com"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(t.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn sign_out_clears_cookies() {
        let t = test_app().await;
        let (cookie_header, _csrf) = bootstrap_csrf(&t.app).await;

        let response = t
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signout")
                    .header(header::COOKIE, &cookie_header)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cleared = set_cookies(&response);
        assert_eq!(cleared["hrms_session"], "");
        assert_eq!(cleared["XSRF-TOKEN"], "");
        assert_eq!(t.repo.session_count(), 0);
    }
}
