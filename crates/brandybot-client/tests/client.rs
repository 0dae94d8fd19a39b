//! Client SDK tests against a mocked API server.

use brandybot_client::interview::{LOGO_FAILED, LOGO_READY};
use brandybot_client::{
    BrandyBotClient, ChatRequest, ChatTurn, ClientError, GenerateLogoRequest, InterviewSession,
    MockupRequest, Sender, Turn,
};
use brandybot_core::{
    AuthProvider, Brand, BrandStatus, BrandyError, LogoHistory, LogoRequest, MockupKind, NewBrand,
    NewUser, Question, User, UserId,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "id-token";

fn client(server: &MockServer) -> BrandyBotClient {
    BrandyBotClient::new(server.uri()).unwrap().with_token(TOKEN)
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn fail(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "status": if status >= 500 { "error" } else { "fail" },
        "code": code,
        "message": message,
    }))
}

fn user() -> User {
    User::new(NewUser {
        uid: "alice".into(),
        email: "alice@example.com".into(),
        display_name: "Alice".into(),
        photo_url: String::new(),
        provider: AuthProvider::Google,
    })
    .unwrap()
}

fn logo(brand_name: &str) -> LogoHistory {
    let request = LogoRequest::new(brand_name, "an owl", Some("playful"), None, vec![]).unwrap();
    let mut logo = LogoHistory::processing(UserId::generate(), &request);
    logo.complete("https://i.ibb.co/owl.png".into(), 1024, &[]);
    logo
}

fn brand(name: &str) -> Brand {
    Brand::new(
        UserId::generate(),
        NewBrand {
            brand_name: name.into(),
            ..NewBrand::default()
        },
    )
    .unwrap()
}

#[tokio::test]
async fn sync_sends_bearer_token_and_returns_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sync"))
        .and(header("authorization", "Bearer id-token"))
        .and(body_json(json!({ "displayName": "Alice" })))
        .respond_with(ok(json!({ "user": user() })))
        .expect(1)
        .mount(&server)
        .await;

    let synced = client(&server)
        .sync_user(&brandybot_client::SyncRequest {
            display_name: Some("Alice".into()),
            photo_url: None,
        })
        .await
        .unwrap();
    assert_eq!(synced.uid, "alice");
    assert_eq!(synced.email, "alice@example.com");
}

#[tokio::test]
async fn unauthorized_maps_to_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(fail(401, "unauthorized", "Invalid or expired token. Please log in again."))
        .mount(&server)
        .await;

    let err = client(&server).me().await.unwrap_err();
    assert!(
        matches!(&err, ClientError::Unauthorized(m) if m.contains("expired")),
        "{err:?}"
    );
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn not_found_and_rate_limit_map_to_typed_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logos/01J0000000000000000000000Z"))
        .respond_with(fail(404, "not_found", "Logo not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logos/stats"))
        .respond_with(fail(429, "rate_limited", "Too many requests"))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.logo("01J0000000000000000000000Z").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Logo not found"));

    let err = client.logo_stats().await.unwrap_err();
    assert!(matches!(err, ClientError::RateLimited(_)));
}

#[tokio::test]
async fn other_errors_keep_code_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logos/generate"))
        .respond_with(fail(400, "bad_request", "Please provide brand name and prompt"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/utils/remove-bg"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .generate_logo(&GenerateLogoRequest::default())
        .await
        .unwrap_err();
    match err {
        ClientError::Api {
            code,
            message,
            status,
        } => {
            assert_eq!(code, "bad_request");
            assert_eq!(message, "Please provide brand name and prompt");
            assert_eq!(status, 400);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.remove_background("https://x/y.png").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { ref code, status: 502, .. } if code == "unknown"));
}

#[tokio::test]
async fn generated_logo_carries_summary() {
    let server = MockServer::start().await;
    let mut data = serde_json::to_value(logo("Hoot")).unwrap();
    data["summary"] = json!("Owl incoming!");
    Mock::given(method("POST"))
        .and(path("/api/logos/generate"))
        .and(body_json(json!({
            "brandName": "Hoot",
            "prompt": "an owl",
            "style": "playful",
        })))
        .respond_with(ok(data))
        .mount(&server)
        .await;

    let generated = client(&server)
        .generate_logo(&GenerateLogoRequest {
            brand_name: "Hoot".into(),
            prompt: "an owl".into(),
            style: Some("playful".into()),
            ..GenerateLogoRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(generated.logo.brand_name, "Hoot");
    assert_eq!(generated.logo.logo_url, "https://i.ibb.co/owl.png");
    assert_eq!(generated.summary.as_deref(), Some("Owl incoming!"));
}

#[tokio::test]
async fn history_returns_page_and_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logos/history"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 1,
            "pagination": { "page": 2, "limit": 1, "total": 3, "pages": 3 },
            "data": [logo("Hoot")],
        })))
        .mount(&server)
        .await;

    let page = client(&server).logo_history(2, 1).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.pages, 3);
}

#[tokio::test]
async fn rating_posts_value() {
    let server = MockServer::start().await;
    let mut rated = logo("Hoot");
    rated.rate(5).unwrap();
    let id = rated.id.to_string();
    Mock::given(method("POST"))
        .and(path(format!("/api/logos/{id}/rate")))
        .and(body_json(json!({ "rating": 5 })))
        .respond_with(ok(serde_json::to_value(&rated).unwrap()))
        .expect(1)
        .mount(&server)
        .await;

    let logo = client(&server).rate_logo(&id, 5).await.unwrap();
    assert_eq!(logo.rating, Some(5));
    assert!(logo.is_selected);
}

#[tokio::test]
async fn brand_listing_passes_status_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/brands"))
        .and(query_param("status", "archived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 1,
            "data": [brand("Old Co")],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let brands = client(&server)
        .brands(Some(BrandStatus::Archived))
        .await
        .unwrap();
    assert_eq!(brands.len(), 1);
    assert_eq!(brands[0].brand_name, "Old Co");
}

#[tokio::test]
async fn deleting_a_brand_accepts_empty_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/brands/b-1"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_brand("b-1").await.unwrap();
}

#[tokio::test]
async fn public_brand_is_fetched_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/brands/public/share-123"))
        .respond_with(ok(serde_json::to_value(brand("Shared Co")).unwrap()))
        .mount(&server)
        .await;

    let shared = client(&server).public_brand("share-123").await.unwrap();
    assert_eq!(shared.brand_name, "Shared Co");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn mockups_use_wire_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mockups/templates"))
        .respond_with(ok(json!([
            { "id": "businessCard", "name": "Business Card", "category": "print" },
            { "id": "tshirt", "name": "T-Shirt", "category": "merchandise" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/mockups/generate"))
        .and(body_json(json!({
            "logoUrl": "https://i.ibb.co/owl.png",
            "type": "tshirt",
        })))
        .respond_with(ok(json!({
            "mockupUrl": "https://cdn.example/tshirt.png",
            "type": "tshirt",
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let templates = client.mockup_templates().await.unwrap();
    assert_eq!(templates[0].id, "businessCard");

    let mockup = client
        .generate_mockup(&MockupRequest {
            logo_url: "https://i.ibb.co/owl.png".into(),
            kind: MockupKind::Tshirt,
            brand_id: None,
        })
        .await
        .unwrap();
    assert_eq!(mockup.kind, MockupKind::Tshirt);
    assert_eq!(mockup.mockup_url, "https://cdn.example/tshirt.png");
}

#[tokio::test]
async fn chat_sends_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/message"))
        .and(body_partial_json(json!({
            "message": "Which font?",
            "history": [
                { "role": "user", "content": "I run a bakery" },
                { "role": "assistant", "content": "Lovely!" },
            ],
        })))
        .respond_with(ok(json!({
            "message": "Try a rounded serif.",
            "sender": "ai",
            "timestamp": "2026-10-17T10:00:00Z",
        })))
        .mount(&server)
        .await;

    let reply = client(&server)
        .chat(&ChatRequest {
            message: "Which font?".into(),
            context: None,
            history: vec![
                ChatTurn::user("I run a bakery"),
                ChatTurn::assistant("Lovely!"),
            ],
        })
        .await
        .unwrap();
    assert_eq!(reply.message, "Try a rounded serif.");
    assert_eq!(reply.sender, "ai");
}

#[tokio::test]
async fn background_removal_returns_hosted_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/utils/remove-bg"))
        .and(body_json(json!({ "imageUrl": "https://i.ibb.co/owl.png" })))
        .respond_with(ok(json!({ "transparentUrl": "https://i.ibb.co/owl-clear.png" })))
        .mount(&server)
        .await;

    let url = client(&server)
        .remove_background("https://i.ibb.co/owl.png")
        .await
        .unwrap();
    assert_eq!(url, "https://i.ibb.co/owl-clear.png");
}

#[tokio::test]
async fn interview_generates_logo_from_answers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logos/generate"))
        .and(body_json(json!({
            "brandName": "Hoot",
            "prompt": "A playful logo for Hoot in education industry",
            "style": "playful",
            "industry": "education",
        })))
        .respond_with(ok(serde_json::to_value(logo("Hoot")).unwrap()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut session = InterviewSession::new();

    assert!(matches!(
        session.send(&client, "   ").await.unwrap(),
        Turn::Ignored
    ));
    assert!(matches!(
        session.send(&client, "Hoot").await.unwrap(),
        Turn::Asked(Question::Style)
    ));
    assert!(matches!(
        session.send(&client, "playful").await.unwrap(),
        Turn::Asked(Question::Industry)
    ));
    let Turn::Generated(generated) = session.send(&client, "education").await.unwrap() else {
        panic!("expected a generated logo");
    };
    assert_eq!(generated.logo.brand_name, "Hoot");

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 8);
    assert_eq!(transcript[1].sender, Sender::User);
    assert_eq!(transcript.last().unwrap().text, LOGO_READY);

    let err = session.send(&client, "again").await.unwrap_err();
    assert!(matches!(err, ClientError::Domain(BrandyError::InterviewComplete)));
}

#[tokio::test]
async fn interview_reports_generation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logos/generate"))
        .respond_with(fail(500, "generation_failed", "Logo generation failed: timeout"))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut session = InterviewSession::new();
    for answer in ["Hoot", "playful"] {
        session.send(&client, answer).await.unwrap();
    }

    let turn = session.send(&client, "education").await.unwrap();
    assert!(matches!(turn, Turn::Failed(ClientError::Api { status: 500, .. })));
    assert_eq!(session.transcript().last().unwrap().text, LOGO_FAILED);

    session.reset();
    assert_eq!(session.current(), Some(Question::BrandName));
    assert_eq!(session.transcript().len(), 1);
}
