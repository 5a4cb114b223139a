//! Shared helpers for the integration tests.

use aspace_client::AspaceClient;
use aspace_domain::AspaceConfig;
use once_cell::sync::Lazy;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session token every mock backend hands out at login.
pub const TEST_SESSION: &str = "test-session-token";

// Opt into client logs during test runs via RUST_LOG.
static TRACING: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
});

/// Start a mock backend that accepts the test credentials.
pub async fn mock_backend() -> MockServer {
    Lazy::force(&TRACING);
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "session": TEST_SESSION,
            "user": {"username": "admin"}
        })))
        .mount(&server)
        .await;
    server
}

/// Configuration pointing at a mock backend.
pub fn test_config(server: &MockServer) -> AspaceConfig {
    AspaceConfig::new(server.uri(), "admin")
        .with_password("secret")
        .with_frontend_url("https://aspace.example.edu")
}

/// Connect a client against a mock backend.
pub async fn connected_client(server: &MockServer) -> AspaceClient {
    AspaceClient::connect(test_config(server)).await.expect("client connects")
}
