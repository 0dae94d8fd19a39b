//! Firebase ID token verification against a mocked JWKS endpoint.

mod common;

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brandybot_service::{create_router, AppState};
use brandybot_store::{MemoryStore, Store};

const PROJECT: &str = "brandybot-test";
const KID: &str = "test-key-1";
const PRIVATE_KEY: &[u8] = include_bytes!("fixtures/identity_test_key.pem");
const JWKS: &str = include_str!("fixtures/identity_jwks.json");

struct Firebase {
    server: TestServer,
    store: Arc<MemoryStore>,
    mock: MockServer,
}

async fn firebase() -> Firebase {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(JWKS.as_bytes().to_vec(), "application/json"),
        )
        .mount(&mock)
        .await;

    let mut config = common::base_config();
    config.firebase.project_id = Some(PROJECT.into());
    config.firebase.api_key = Some("web-api-key".into());
    config.firebase.jwks_url = format!("{}/jwks", mock.uri());
    config.firebase.identity_toolkit_url = mock.uri();

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Arc::clone(&store) as Arc<dyn Store>, config).unwrap();
    let server = TestServer::new(create_router(state)).unwrap();

    Firebase {
        server,
        store,
        mock,
    }
}

fn sign(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.into());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY).unwrap();
    encode(&header, claims, &key).unwrap()
}

fn claims(uid: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "sub": uid,
        "aud": PROJECT,
        "iss": format!("https://securetoken.google.com/{PROJECT}"),
        "iat": now,
        "exp": now + 3600,
        "email": "Ada@Example.com",
        "name": "Ada Lovelace",
        "picture": "https://example.com/ada.png",
        "firebase": { "sign_in_provider": "google.com" }
    })
}

#[tokio::test]
async fn valid_token_signs_user_in() {
    let fb = firebase().await;
    let token = sign(&claims("uid-ada"), KID);

    let response = fb
        .server
        .get("/api/auth/me")
        .add_header("authorization", format!("Bearer {token}"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let user = &body["data"]["user"];
    assert_eq!(user["uid"], "uid-ada");
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["displayName"], "Ada Lovelace");
    assert_eq!(user["provider"], "google");
    assert!(fb.store.get_user_by_uid("uid-ada").await.unwrap().is_some());
}

#[tokio::test]
async fn wrong_audience_is_rejected() {
    let fb = firebase().await;
    let mut other = claims("uid-ada");
    other["aud"] = json!("someone-else");

    let response = fb
        .server
        .get("/api/auth/me")
        .add_header("authorization", format!("Bearer {}", sign(&other, KID)))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid or expired token. Please log in again.");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let fb = firebase().await;
    let mut expired = claims("uid-ada");
    let past = chrono::Utc::now().timestamp() - 7200;
    expired["iat"] = json!(past);
    expired["exp"] = json!(past + 60);

    fb.server
        .get("/api/auth/me")
        .add_header("authorization", format!("Bearer {}", sign(&expired, KID)))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn unknown_key_id_is_rejected() {
    let fb = firebase().await;

    fb.server
        .get("/api/auth/me")
        .add_header(
            "authorization",
            format!("Bearer {}", sign(&claims("uid-ada"), "rotated-away")),
        )
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn account_deletion_calls_identity_toolkit() {
    let fb = firebase().await;
    let token = sign(&claims("uid-ada"), KID);

    Mock::given(method("POST"))
        .and(path("/v1/accounts:delete"))
        .and(query_param("key", "web-api-key"))
        .and(body_json(json!({ "idToken": token })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&fb.mock)
        .await;

    fb.server
        .delete("/api/users/account")
        .add_header("authorization", format!("Bearer {token}"))
        .await
        .assert_status_ok();

    assert!(fb.store.get_user_by_uid("uid-ada").await.unwrap().is_none());
}
