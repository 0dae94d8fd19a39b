//! Chat integration tests.

mod common;

use common::TestHarness;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn blank_message_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/chat/message")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "message": "   " }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Message is required");
}

#[tokio::test]
async fn malformed_body_uses_error_envelope() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/chat/message")
        .add_header("authorization", harness.user_auth_header())
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn without_llm_replies_with_fallback() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/chat/message")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "message": "Which colours suit a bakery?" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["sender"], "ai");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("I'm having a little trouble thinking right now"));
    assert!(body["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn gemini_answers_with_history_and_context() {
    let harness = TestHarness::with_services(|config| {
        config.llm.gemini_api_key = Some("gemini-key".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "I run a bakery" }] },
                { "role": "model", "parts": [{ "text": "Lovely! Who are your customers?" }] },
                { "role": "user", "parts": [{ "text": "Context: Brand: Crumb\n\nUser: Families" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": " Warm pastels would work well. " }] } }]
        })))
        .expect(1)
        .mount(harness.mock())
        .await;

    let response = harness
        .server
        .post("/api/chat/message")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "message": "Families",
            "context": "Brand: Crumb",
            "history": [
                { "role": "user", "content": "I run a bakery" },
                { "role": "model", "content": "Lovely! Who are your customers?" }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["message"], "Warm pastels would work well.");
}

#[tokio::test]
async fn falls_back_to_openai_when_gemini_fails() {
    let harness = TestHarness::with_services(|config| {
        config.llm.gemini_api_key = Some("gemini-key".into());
        config.llm.openai_api_key = Some("sk-test".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500))
        .mount(harness.mock())
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Try a rounded serif." } }]
        })))
        .expect(1)
        .mount(harness.mock())
        .await;

    let body: Value = harness
        .server
        .post("/api/chat/message")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "message": "Fonts?" }))
        .await
        .json();

    assert_eq!(body["data"]["message"], "Try a rounded serif.");
}
