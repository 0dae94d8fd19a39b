//! Background removal integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn remove_bg_request(harness: &TestHarness) -> axum_test::TestRequest {
    harness
        .server
        .post("/api/utils/remove-bg")
        .add_header("authorization", harness.user_auth_header())
}

#[tokio::test]
async fn image_url_is_required() {
    let harness = TestHarness::new();

    let response = remove_bg_request(&harness).json(&json!({})).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Image URL is required");
}

#[tokio::test]
async fn unconfigured_keys_are_unavailable() {
    let harness = TestHarness::new();

    remove_bg_request(&harness)
        .json(&json!({ "imageUrl": "https://i.ibb.co/logo.png" }))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn transparent_image_is_rehosted() {
    let harness = TestHarness::with_services(|config| {
        config.remove_bg_api_key = Some("rbg-key".into());
        config.imgbb_api_key = Some("imgbb-key".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v1.0/removebg"))
        .and(header("x-api-key", "rbg-key"))
        .and(body_string_contains("https://i.ibb.co/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"transparent-png".to_vec()),
        )
        .expect(1)
        .mount(harness.mock())
        .await;
    Mock::given(method("POST"))
        .and(path("/1/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "url": "https://i.ibb.co/clear.png" }
        })))
        .expect(1)
        .mount(harness.mock())
        .await;

    let response = remove_bg_request(&harness)
        .json(&json!({ "imageUrl": "https://i.ibb.co/logo.png" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["transparentUrl"], "https://i.ibb.co/clear.png");
}

#[tokio::test]
async fn provider_failure_is_bad_gateway() {
    let harness = TestHarness::with_services(|config| {
        config.remove_bg_api_key = Some("rbg-key".into());
        config.imgbb_api_key = Some("imgbb-key".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v1.0/removebg"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "errors": [{ "title": "Insufficient credits" }]
        })))
        .mount(harness.mock())
        .await;

    let response = remove_bg_request(&harness)
        .json(&json!({ "imageUrl": "https://i.ibb.co/logo.png" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "Failed to remove background. The API may be out of credits or the image is invalid."
    );
}
