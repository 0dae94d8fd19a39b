//! BrandyBot HTTP client implementation.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use brandybot_core::{
    Brand, BrandStatus, BrandUpdate, GeneratedGuidelines, LogoHistory, LogoStats, NewBrand,
    ProfileUpdate, User,
};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BrandProfile, ChatReply, ChatRequest, Envelope, GenerateLogoRequest,
    GeneratedLogo, HealthStatus, MessageResponse, MockupRequest, MockupResult, MockupTemplate,
    Page, RateRequest, RemoveBgRequest, RemoveBgResult, ServerInfo, ShareLink, SyncRequest,
    UserPayload,
};

/// BrandyBot API client.
///
/// Every `/api` call except the public brand view carries the ID token set
/// with [`BrandyBotClient::with_token`].
#[derive(Debug, Clone)]
pub struct BrandyBotClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BrandyBotClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API server (e.g., `"http://localhost:5000"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: options.token,
        })
    }

    /// Use `token` as the bearer ID token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    /// Replace the bearer ID token, e.g. after a refresh.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Forget the bearer ID token (sign-out).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether an ID token is set.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ---- Service ----

    /// Fetch the server banner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn server_info(&self) -> Result<ServerInfo, ClientError> {
        let response = self.request(Method::GET, "/").send().await?;
        self.handle_response(response).await
    }

    /// Probe liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        self.handle_response(response).await
    }

    // ---- Auth & users ----

    /// Record a sign-in and refresh the profile fields from the identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn sync_user(&self, request: &SyncRequest) -> Result<User, ClientError> {
        let payload: UserPayload = self
            .send(self.request(Method::POST, "/api/auth/sync").json(request))
            .await?;
        Ok(payload.user)
    }

    /// Get the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn me(&self) -> Result<User, ClientError> {
        let payload: UserPayload = self.send(self.request(Method::GET, "/api/auth/me")).await?;
        Ok(payload.user)
    }

    /// Get the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn profile(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/api/users/profile"))
            .await
    }

    /// Update the display name and merge preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        self.send(self.request(Method::PUT, "/api/users/profile").json(update))
            .await
    }

    /// Delete the caller's account and everything they own.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete_account(&self) -> Result<String, ClientError> {
        let response: MessageResponse = self
            .send(self.request(Method::DELETE, "/api/users/account"))
            .await?;
        Ok(response.message)
    }

    // ---- Logos ----

    /// Generate a logo.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_logo(
        &self,
        request: &GenerateLogoRequest,
    ) -> Result<GeneratedLogo, ClientError> {
        tracing::debug!(brand = %request.brand_name, "Requesting logo generation");
        self.send(self.request(Method::POST, "/api/logos/generate").json(request))
            .await
    }

    /// List the caller's logos, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn logo_history(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Page<LogoHistory>, ClientError> {
        let builder = self
            .request(Method::GET, "/api/logos/history")
            .query(&[("page", page), ("limit", limit)]);
        let response = builder.send().await?;
        let envelope: Envelope<Vec<LogoHistory>> = self.handle_response(response).await?;
        let pagination = envelope.pagination.ok_or_else(|| ClientError::Api {
            code: "invalid_response".into(),
            message: "history response carried no pagination".into(),
            status: StatusCode::OK.as_u16(),
        })?;
        Ok(Page {
            items: envelope.data,
            pagination,
        })
    }

    /// Aggregate statistics over the caller's logos.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn logo_stats(&self) -> Result<LogoStats, ClientError> {
        self.send(self.request(Method::GET, "/api/logos/stats"))
            .await
    }

    /// Get one of the caller's logos.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn logo(&self, id: &str) -> Result<LogoHistory, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/logos/{id}")))
            .await
    }

    /// Rate a logo from 1 to 5; 4 or more selects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn rate_logo(&self, id: &str, rating: i64) -> Result<LogoHistory, ClientError> {
        self.send(
            self.request(Method::POST, &format!("/api/logos/{id}/rate"))
                .json(&RateRequest { rating }),
        )
        .await
    }

    /// Mark a logo as downloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn mark_downloaded(&self, id: &str) -> Result<LogoHistory, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/logos/{id}/download")))
            .await
    }

    // ---- Brands ----

    /// Create a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_brand(&self, brand: &NewBrand) -> Result<Brand, ClientError> {
        self.send(self.request(Method::POST, "/api/brands").json(brand))
            .await
    }

    /// List the caller's brands with `status` (active when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn brands(&self, status: Option<BrandStatus>) -> Result<Vec<Brand>, ClientError> {
        let mut builder = self.request(Method::GET, "/api/brands");
        if let Some(status) = status {
            builder = builder.query(&[("status", status)]);
        }
        self.send(builder).await
    }

    /// Get one of the caller's brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn brand(&self, id: &str) -> Result<Brand, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/brands/{id}")))
            .await
    }

    /// Update a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn update_brand(&self, id: &str, update: &BrandUpdate) -> Result<Brand, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/api/brands/{id}"))
                .json(update),
        )
        .await
    }

    /// Delete a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn delete_brand(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send(self.request(Method::DELETE, &format!("/api/brands/{id}")))
            .await?;
        Ok(())
    }

    /// Make a brand public, returning its share link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn share_brand(&self, id: &str) -> Result<ShareLink, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/brands/{id}/share")))
            .await
    }

    /// Archive a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn archive_brand(&self, id: &str) -> Result<Brand, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/brands/{id}/archive")))
            .await
    }

    /// Re-activate an archived brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn activate_brand(&self, id: &str) -> Result<Brand, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/brands/{id}/activate")))
            .await
    }

    /// View a shared brand; no token is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn public_brand(&self, share_link: &str) -> Result<Brand, ClientError> {
        let url = format!("{}/api/brands/public/{share_link}", self.base_url);
        self.send(self.client.get(url)).await
    }

    /// Generate a guideline document from a profile without storing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_guidelines(
        &self,
        profile: &BrandProfile,
    ) -> Result<GeneratedGuidelines, ClientError> {
        self.send(
            self.request(Method::POST, "/api/brands/guidelines/generate")
                .json(profile),
        )
        .await
    }

    /// Regenerate and store a brand's guidelines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn regenerate_guidelines(&self, id: &str) -> Result<Brand, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/brands/{id}/guidelines")))
            .await
    }

    // ---- Mockups ----

    /// Render a logo onto a product template.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn generate_mockup(
        &self,
        request: &MockupRequest,
    ) -> Result<MockupResult, ClientError> {
        self.send(
            self.request(Method::POST, "/api/mockups/generate")
                .json(request),
        )
        .await
    }

    /// List the mockup template catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn mockup_templates(&self) -> Result<Vec<MockupTemplate>, ClientError> {
        self.send(self.request(Method::GET, "/api/mockups/templates"))
            .await
    }

    // ---- Chat & utilities ----

    /// Ask the branding assistant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.send(self.request(Method::POST, "/api/chat/message").json(request))
            .await
    }

    /// Remove an image's background, returning the hosted transparent PNG URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn remove_background(&self, image_url: &str) -> Result<String, ClientError> {
        let result: RemoveBgResult = self
            .send(
                self.request(Method::POST, "/api/utils/remove-bg")
                    .json(&RemoveBgRequest { image_url }),
            )
            .await?;
        Ok(result.transparent_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let envelope: Envelope<T> = self.handle_response(response).await?;
        Ok(envelope.data)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        let (code, message) = match error_body {
            Ok(api_error) => (api_error.code, api_error.message),
            Err(_) => ("unknown".to_string(), format!("HTTP {status}")),
        };

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(%message, "Unauthorized access - potential token expiry");
                Err(ClientError::Unauthorized(message))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited(message)),
            _ => Err(ClientError::Api {
                code,
                message,
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 120, covering logo generation).
    pub timeout_seconds: u64,
    /// Initial bearer ID token.
    pub token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = BrandyBotClient::new("http://localhost:5000").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = BrandyBotClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = BrandyBotClient::new("/").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn token_can_be_replaced_and_cleared() {
        let mut client = BrandyBotClient::new("http://localhost:5000")
            .unwrap()
            .with_token("first");
        client.set_token("second");
        assert_eq!(client.token.as_deref(), Some("second"));
        client.clear_token();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn client_options() {
        let options = ClientOptions {
            token: Some("id-token".into()),
            ..ClientOptions::default()
        };
        let client = BrandyBotClient::with_options("http://localhost:5000", options).unwrap();
        assert!(client.is_authenticated());
    }
}
