//! remove.bg background removal client.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::Client;

/// Error type for remove.bg operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoveBgError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// remove.bg returned an error.
    #[error("remove.bg returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },
}

/// remove.bg client.
#[derive(Debug, Clone)]
pub struct RemoveBgClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoveBgClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RemoveBgError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Remove the background of the image at `image_url`, returning PNG bytes.
    pub async fn remove_background(&self, image_url: &str) -> Result<Vec<u8>, RemoveBgError> {
        let url = format!("{}/v1.0/removebg", self.base_url);
        let form = Form::new()
            .text("size", "auto")
            .text("image_url", image_url.to_string());

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["errors"][0]["title"].as_str().map(ToString::to_string))
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(RemoveBgError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
