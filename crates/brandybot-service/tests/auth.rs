//! Authentication integration tests.

mod common;

use common::{base_config, StaticIdentity, TestHarness};
use serde_json::json;

use brandybot_store::Store;

#[tokio::test]
async fn missing_token_is_rejected() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/auth/me").await;

    response.assert_status_unauthorized();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "You are not logged in! Please log in to get access."
    );
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/users/profile")
        .add_header("authorization", "Bearer forged")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn first_request_creates_user() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["uid"], "alice");
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["provider"], "google");

    let stored = harness.store.get_user_by_uid("alice").await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn repeated_requests_reuse_the_user() {
    let harness = TestHarness::new();

    let first: serde_json::Value = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    let second: serde_json::Value = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();

    assert_eq!(first["data"]["user"]["id"], second["data"]["user"]["id"]);
    assert_eq!(harness.store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn sync_updates_non_empty_fields() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/auth/sync")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "displayName": "Alice A.", "photoURL": "" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["user"]["displayName"], "Alice A.");
    assert_eq!(body["data"]["user"]["photoURL"], "");
}

#[tokio::test]
async fn auth_routes_have_a_stricter_limit() {
    let mut config = base_config();
    config.rate_limit.auth_max_requests = 2;
    let harness = TestHarness::with_config(config, StaticIdentity::default());

    for _ in 0..2 {
        harness
            .server
            .get("/api/auth/me")
            .add_header("authorization", harness.user_auth_header())
            .await
            .assert_status_ok();
    }

    let response = harness
        .server
        .get("/api/auth/me")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);

    // The general API bucket is separate.
    harness
        .server
        .get("/api/users/profile")
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();
}
