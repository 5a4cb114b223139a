//! Listing endpoints and connection lifecycle.

mod support;

use aspace_client::AspaceClient;
use aspace_domain::{AspaceConfig, AspaceError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{connected_client, mock_backend, test_config};

#[tokio::test]
async fn list_resource_ids_returns_only_integers() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/resources"))
        .and(query_param("all_ids", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 5, 851])))
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let ids = client.list_resource_ids().await.expect("ids");
    assert_eq!(ids, vec![1, 5, 851]);
}

#[tokio::test]
async fn list_resources_returns_full_records() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/resources"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_page": 1,
            "last_page": 1,
            "results": [
                {"uri": "/repositories/2/resources/1", "title": "Faculty papers"},
                {"uri": "/repositories/2/resources/5", "title": "University records"}
            ]
        })))
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let page = client.list_resources(1).await.expect("page");
    let results = page["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["title"], "Faculty papers");
}

#[tokio::test]
async fn connect_without_password_fails_before_any_request() {
    let server = MockServer::start().await;
    // No mocks at all: any request would 404 and show up in the log.

    let config = AspaceConfig::new(server.uri(), "admin");
    let err = AspaceClient::connect(config).await.unwrap_err();

    assert!(matches!(err, AspaceError::Config(_)));
    assert!(err.to_string().contains("password"));
    assert!(server.received_requests().await.expect("request log").is_empty());
}

#[tokio::test]
async fn connect_with_bad_credentials_surfaces_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/admin/login"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "Login failed"})),
        )
        .mount(&server)
        .await;

    let err = AspaceClient::connect(test_config(&server)).await.unwrap_err();
    assert!(matches!(err, AspaceError::Auth(_)));
    assert!(err.to_string().contains("Login failed"));
}

#[tokio::test]
async fn expired_session_surfaces_auth_error() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/repositories/2/resources/1"))
        .respond_with(
            ResponseTemplate::new(412).set_body_json(json!({"code": "SESSION_GONE"})),
        )
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    let err = client.get_resource(1).await.unwrap_err();
    match err {
        AspaceError::Communication { status, .. } => assert_eq!(status, 412),
        other => panic!("expected communication error, got {other:?}"),
    }
}

#[tokio::test]
async fn logout_posts_to_the_backend() {
    let server = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Logged out"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connected_client(&server).await;
    client.logout().await.expect("logout");
}
