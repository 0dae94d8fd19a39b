//! Profile and account integration tests.

mod common;

use common::{base_config, StaticIdentity, TestHarness};
use serde_json::json;

use brandybot_store::Store;

#[tokio::test]
async fn profile_update_merges_preferences() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .put("/api/users/profile")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "displayName": "Alice", "preferences": { "theme": "dark" } }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["displayName"], "Alice");
    assert_eq!(body["data"]["preferences"]["theme"], "dark");
    assert_eq!(body["data"]["preferences"]["notifications"], true);

    let profile: serde_json::Value = harness
        .server
        .get("/api/users/profile")
        .add_header("authorization", harness.user_auth_header())
        .await
        .json();
    assert_eq!(profile["data"]["preferences"]["theme"], "dark");
}

#[tokio::test]
async fn blank_display_name_is_ignored() {
    let harness = TestHarness::new();

    let body: serde_json::Value = harness
        .server
        .put("/api/users/profile")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "displayName": "   " }))
        .await
        .json();

    assert_eq!(body["data"]["displayName"], "User alice");
}

#[tokio::test]
async fn delete_account_cascades() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/brands")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "brandName": "Acme" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = harness
        .server
        .delete("/api/users/account")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["message"], "Account deleted successfully");

    assert!(harness.store.list_users().await.unwrap().is_empty());
    assert_eq!(
        harness.identity.deleted.lock().unwrap().as_slice(),
        ["test-token:alice".to_string()]
    );
}

#[tokio::test]
async fn provider_failure_does_not_block_deletion() {
    let harness = TestHarness::with_config(
        base_config(),
        StaticIdentity {
            fail_deletes: true,
            ..StaticIdentity::default()
        },
    );

    harness
        .server
        .delete("/api/users/account")
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    assert!(harness.store.get_user_by_uid("alice").await.unwrap().is_none());
}
