//! Builders wiring the auth use cases and `AppState` to in-memory mocks.
//!
//! `TestAuth` is for use case tests, `TestAppStateBuilder` for HTTP-level
//! tests through `axum-test`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::{jwt::Signer, tokens::TokenService},
    domain::entities::user::User,
    infra::config::AppConfig,
    test_utils::{FixedClock, InMemoryEmailSender, InMemoryUserRepo, PlainHasher, T0},
    use_cases::user::{AuthSettings, AuthUseCases},
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";
pub const TEST_APP_ORIGIN: &str = "http://localhost:3000";

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        session_ttl: Duration::days(10),
        verify_ttl: Duration::days(1),
        reset_ttl: Duration::minutes(15),
        app_origin: Url::parse(TEST_APP_ORIGIN).unwrap(),
    }
}

// ============================================================================
// TestAuth
// ============================================================================

/// Auth use cases over in-memory ports, with a clock frozen at `T0`.
///
/// The mocks are exposed so tests can seed users, move time and read mail.
pub struct TestAuth {
    pub auth: AuthUseCases,
    pub repo: Arc<InMemoryUserRepo>,
    pub clock: Arc<FixedClock>,
    pub email: Arc<InMemoryEmailSender>,
}

impl TestAuth {
    pub fn new() -> Self {
        Self::with_repo(Arc::new(InMemoryUserRepo::new()))
    }

    pub fn with_repo(repo: Arc<InMemoryUserRepo>) -> Self {
        let clock = Arc::new(FixedClock::new(T0));
        let email = Arc::new(InMemoryEmailSender::new());
        let signer = Signer::new(&SecretString::new(TEST_JWT_SECRET.into()));
        let tokens = Arc::new(TokenService::new(signer, clock.clone()));

        let auth = AuthUseCases::new(
            repo.clone(),
            tokens,
            Arc::new(PlainHasher),
            email.clone(),
            test_settings(),
        );

        Self {
            auth,
            repo,
            clock,
            email,
        }
    }
}

impl Default for TestAuth {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TestAppStateBuilder
// ============================================================================

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let (app_state, mocks) = TestAppStateBuilder::new()
///     .with_user(create_test_user(|u| u.verified = true))
///     .build_with_mocks();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<User>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    /// Add a user to the test state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Build the AppState and return the mocks behind it for assertions.
    pub fn build_with_mocks(self) -> (AppState, TestAuth) {
        let repo = Arc::new(InMemoryUserRepo::with_users(self.users));
        let mocks = TestAuth::with_repo(repo);

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
            session_token_ttl: Duration::days(10),
            verify_token_ttl: Duration::days(1),
            reset_token_ttl: Duration::minutes(15),
            app_origin: Url::parse(TEST_APP_ORIGIN).unwrap(),
            cors_origin: HeaderValue::from_static(TEST_APP_ORIGIN),
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            email_from: "no-reply@test".to_string(),
            resend_api_key: None,
            admin_email: "admin@test".to_string(),
            admin_password: SecretString::new("admin-password".into()),
        });

        let app_state = AppState {
            config,
            auth_use_cases: Arc::new(mocks.auth.clone()),
        };

        (app_state, mocks)
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
