//! Common test utilities for brandybot integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use wiremock::MockServer;

use brandybot_service::auth::{AuthError, Identity, IdentityProvider};
use brandybot_service::{create_router, AppState, ServiceConfig};
use brandybot_store::{MemoryStore, Store};

/// Prefix of tokens accepted by [`StaticIdentity`].
pub const TOKEN_PREFIX: &str = "test-token:";

/// Identity provider accepting `test-token:<uid>` bearer tokens.
#[derive(Default)]
pub struct StaticIdentity {
    /// Tokens passed to `delete_account`.
    pub deleted: Mutex<Vec<String>>,
    /// Make `delete_account` fail.
    pub fail_deletes: bool,
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let uid = token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("not a test token".into()))?;
        Ok(Identity {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
            name: Some(format!("User {uid}")),
            picture: None,
            sign_in_provider: Some("google.com".into()),
        })
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), AuthError> {
        self.deleted.lock().unwrap().push(id_token.to_string());
        if self.fail_deletes {
            return Err(AuthError::Api {
                status: 400,
                message: "TOKEN_EXPIRED".into(),
            });
        }
        Ok(())
    }
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Backing store, for direct assertions.
    pub store: Arc<MemoryStore>,
    /// Identity provider fake.
    pub identity: Arc<StaticIdentity>,
    /// Stand-in for every external HTTP service, when started.
    pub mock: Option<MockServer>,
}

impl TestHarness {
    /// Harness with no external integrations configured.
    pub fn new() -> Self {
        Self::build(base_config(), StaticIdentity::default(), None)
    }

    /// Harness with the AI service, both LLMs, `ImgBB` and remove.bg all
    /// pointed at one mock server. `configure` decides which keys are set.
    pub async fn with_services(configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let mock = MockServer::start().await;
        let mut config = base_config();
        config.ai_service_url = mock.uri();
        config.llm.gemini_api_url = mock.uri();
        config.llm.openai_api_url = mock.uri();
        config.imgbb_api_url = mock.uri();
        config.remove_bg_api_url = mock.uri();
        configure(&mut config);
        Self::build(config, StaticIdentity::default(), Some(mock))
    }

    /// Harness with a custom configuration and identity fake.
    pub fn with_config(config: ServiceConfig, identity: StaticIdentity) -> Self {
        Self::build(config, identity, None)
    }

    fn build(config: ServiceConfig, identity: StaticIdentity, mock: Option<MockServer>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(identity);

        let state = AppState::with_identity(
            Arc::clone(&store) as Arc<dyn Store>,
            config,
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
        )
        .expect("Failed to build app state");
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            identity,
            mock,
        }
    }

    /// The mock server; panics if the harness was built without one.
    pub fn mock(&self) -> &MockServer {
        self.mock.as_ref().expect("harness built without mock server")
    }

    /// Authorization header for `uid`.
    pub fn auth_header(uid: &str) -> String {
        format!("Bearer {TOKEN_PREFIX}{uid}")
    }

    /// Authorization header for the default test user.
    pub fn user_auth_header(&self) -> String {
        Self::auth_header("alice")
    }

    /// A different user's auth header (for testing isolation).
    pub fn other_user_auth_header(&self) -> String {
        Self::auth_header("mallory")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration with every external service unreachable and keys unset.
pub fn base_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        ai_service_url: "http://127.0.0.1:9".into(),
        ai_timeout_seconds: 5,
        request_timeout_seconds: 30,
        ..ServiceConfig::default()
    }
}
