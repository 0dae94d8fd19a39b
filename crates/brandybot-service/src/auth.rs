//! Authentication against the Firebase identity provider.
//!
//! - [`IdentityProvider`] verifies ID tokens and deletes provider accounts
//! - [`FirebaseVerifier`] is the production implementation (RS256 tokens
//!   checked against the cached Google JWKS)
//! - [`AuthUser`] is the extractor: it verifies the bearer token and loads or
//!   creates the local user row

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use brandybot_core::{AuthProvider, NewUser, User};
use brandybot_store::StoreError;

use crate::config::FirebaseConfig;
use crate::error::{ApiError, INVALID_TOKEN, NOT_LOGGED_IN};
use crate::state::AppState;

// ============================================================================
// Constants
// ============================================================================

/// How long to cache JWKS keys before refreshing.
const JWKS_CACHE_DURATION: Duration = Duration::from_secs(3600);

/// Timeout for JWKS and Identity Toolkit requests.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Issuer prefix of Firebase ID tokens.
const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Errors from identity verification and account management.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is malformed, expired, or signed by an unknown key.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The signing keys could not be fetched.
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected a management call.
    #[error("identity provider error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// A required setting is missing.
    #[error("identity provider not configured: {0}")]
    NotConfigured(&'static str),
}

/// Verified identity claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider UID (`sub`).
    pub uid: String,
    /// Email claim.
    pub email: Option<String>,
    /// Name claim.
    pub name: Option<String>,
    /// Picture claim.
    pub picture: Option<String>,
    /// `firebase.sign_in_provider` claim.
    pub sign_in_provider: Option<String>,
}

impl Identity {
    /// Fields for a new local user row.
    #[must_use]
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            uid: self.uid.clone(),
            email: self.email.clone().unwrap_or_default(),
            display_name: self.name.clone().unwrap_or_default(),
            photo_url: self.picture.clone().unwrap_or_default(),
            provider: self
                .sign_in_provider
                .as_deref()
                .map_or(AuthProvider::Unknown, AuthProvider::from_sign_in_provider),
        }
    }
}

/// Identity provider operations used by the API.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an ID token.
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;

    /// Delete the provider account that owns `id_token`.
    async fn delete_account(&self, id_token: &str) -> Result<(), AuthError>;
}

// ============================================================================
// Extractor
// ============================================================================

/// An authenticated caller with their local user row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The local user.
    pub user: User,
    /// The verified bearer token.
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized(NOT_LOGGED_IN))?;

        let identity = state.identity.verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ApiError::Unauthorized(INVALID_TOKEN)
        })?;

        let user = load_or_create_user(state, &identity).await?;

        Ok(Self {
            user,
            token: token.to_string(),
        })
    }
}

/// Find the user by UID, creating the row on first sign-in.
async fn load_or_create_user(state: &AppState, identity: &Identity) -> Result<User, ApiError> {
    if let Some(user) = state.store.get_user_by_uid(&identity.uid).await? {
        return Ok(user);
    }

    let user = User::new(identity.to_new_user()).map_err(|e| {
        tracing::debug!(uid = %identity.uid, error = %e, "Token claims cannot form a user");
        ApiError::Unauthorized(INVALID_TOKEN)
    })?;

    match state.store.create_user(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, uid = %user.uid, "User created on first sign-in");
            Ok(user)
        }
        // A concurrent first request may have created the row already.
        Err(StoreError::Conflict(_)) => match state.store.get_user_by_uid(&identity.uid).await? {
            Some(existing) => Ok(existing),
            None => Err(ApiError::Conflict(
                "A record with this value already exists.".into(),
            )),
        },
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Firebase
// ============================================================================

/// Firebase ID token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// Subject (provider UID).
    pub sub: String,
    /// Audience (project id).
    pub aud: String,
    /// Issuer.
    pub iss: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Firebase-specific claims.
    #[serde(default)]
    pub firebase: FirebaseInfo,
}

/// The `firebase` claim object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirebaseInfo {
    /// Sign-in provider, e.g. `google.com`.
    #[serde(default)]
    pub sign_in_provider: Option<String>,
}

/// JWKS (JSON Web Key Set) response structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    /// List of JWK keys.
    pub keys: Vec<Jwk>,
}

/// Single JSON Web Key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type (e.g., "RSA").
    pub kty: String,
    /// Key ID.
    pub kid: Option<String>,
    /// RSA public key modulus (base64url encoded).
    pub n: Option<String>,
    /// RSA public key exponent (base64url encoded).
    pub e: Option<String>,
}

/// Cached signing keys.
struct JwksCache {
    /// Keys mapped by kid.
    keys: HashMap<String, DecodingKey>,
    /// When the cache was last updated.
    last_updated: Instant,
}

impl JwksCache {
    fn new() -> Self {
        Self {
            keys: HashMap::new(),
            // Force initial fetch
            last_updated: Instant::now()
                .checked_sub(JWKS_CACHE_DURATION)
                .unwrap_or_else(Instant::now),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_updated.elapsed() >= JWKS_CACHE_DURATION
    }
}

/// Verifies Firebase ID tokens and manages Firebase accounts.
pub struct FirebaseVerifier {
    client: Client,
    project_id: Option<String>,
    api_key: Option<String>,
    jwks_url: String,
    identity_toolkit_url: String,
    cache: RwLock<JwksCache>,
}

impl FirebaseVerifier {
    /// Create a verifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FirebaseConfig) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;

        if config.project_id.is_none() {
            tracing::warn!("FIREBASE_PROJECT_ID not set - all bearer tokens will be rejected");
        }

        Ok(Self {
            client,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            jwks_url: config.jwks_url.clone(),
            identity_toolkit_url: config.identity_toolkit_url.trim_end_matches('/').to_string(),
            cache: RwLock::new(JwksCache::new()),
        })
    }

    /// Get a decoding key from cache or fetch from the JWKS endpoint.
    async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache_read = self.cache.read().await;
            if !cache_read.is_expired() {
                if let Some(key) = cache_read.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        // Cache miss or expired - Google rotates keys, so refetch on unknown kid
        let jwks = self.fetch_jwks().await?;

        let mut cache_write = self.cache.write().await;
        cache_write.keys.clear();
        cache_write.last_updated = Instant::now();

        for jwk in &jwks.keys {
            if let (Some(key_kid), Some(decoding_key)) = (&jwk.kid, jwk_to_decoding_key(jwk)) {
                cache_write.keys.insert(key_kid.clone(), decoding_key);
            }
        }

        cache_write
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id {kid}")))
    }

    /// Fetch JWKS from the identity provider.
    async fn fetch_jwks(&self) -> Result<Jwks, AuthError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self.client.get(&self.jwks_url).send().await.map_err(|e| {
            tracing::error!(error = %e, url = %self.jwks_url, "Failed to fetch JWKS");
            AuthError::KeyFetch(e.to_string())
        })?;

        if !response.status().is_success() {
            tracing::error!(
                status = %response.status(),
                url = %self.jwks_url,
                "JWKS fetch returned non-success status"
            );
            return Err(AuthError::KeyFetch(format!("HTTP {}", response.status())));
        }

        let jwks: Jwks = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        tracing::info!(keys_count = %jwks.keys.len(), "JWKS fetched successfully");

        Ok(jwks)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let project_id = self
            .project_id
            .as_deref()
            .ok_or(AuthError::NotConfigured("FIREBASE_PROJECT_ID"))?;

        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!("unexpected alg {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".into()))?;

        let decoding_key = self.get_decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{ISSUER_PREFIX}{project_id}")]);

        let claims = decode::<FirebaseClaims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".into()));
        }

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            sign_in_provider: claims.firebase.sign_in_provider,
        })
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), AuthError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AuthError::NotConfigured("FIREBASE_API_KEY"))?;

        let url = format!("{}/v1/accounts:delete", self.identity_toolkit_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["error"]["message"].as_str().map(ToString::to_string))
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(AuthError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Convert a JWK to a `DecodingKey`.
fn jwk_to_decoding_key(jwk: &Jwk) -> Option<DecodingKey> {
    if jwk.kty != "RSA" {
        tracing::debug!(kty = %jwk.kty, "Skipping non-RSA JWK");
        return None;
    }

    let n = jwk.n.as_ref()?;
    let e = jwk.e.as_ref()?;

    DecodingKey::from_rsa_components(n, e).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier(project_id: Option<&str>) -> FirebaseVerifier {
        FirebaseVerifier::new(&FirebaseConfig {
            project_id: project_id.map(ToString::to_string),
            api_key: None,
            jwks_url: "http://127.0.0.1:9/jwks".into(),
            identity_toolkit_url: "http://127.0.0.1:9".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn rejects_tokens_without_project() {
        let err = verifier(None).verify("a.b.c").await.unwrap_err();
        assert!(matches!(err, AuthError::NotConfigured("FIREBASE_PROJECT_ID")));
    }

    #[tokio::test]
    async fn rejects_malformed_tokens_before_fetching_keys() {
        let err = verifier(Some("brandybot")).verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn account_deletion_needs_api_key() {
        let err = verifier(Some("brandybot")).delete_account("token").await.unwrap_err();
        assert!(matches!(err, AuthError::NotConfigured("FIREBASE_API_KEY")));
    }

    #[test]
    fn non_rsa_keys_are_skipped() {
        let jwk = Jwk {
            kty: "EC".into(),
            kid: Some("k".into()),
            n: None,
            e: None,
        };
        assert!(jwk_to_decoding_key(&jwk).is_none());
    }

    #[test]
    fn identity_maps_claims_onto_new_user() {
        let identity = Identity {
            uid: "uid-1".into(),
            email: Some("Owner@Example.com".into()),
            name: None,
            picture: Some("https://example.com/a.png".into()),
            sign_in_provider: Some("google.com".into()),
        };
        let new_user = identity.to_new_user();
        assert_eq!(new_user.uid, "uid-1");
        assert_eq!(new_user.display_name, "");
        assert_eq!(new_user.provider, AuthProvider::Google);
    }
}
