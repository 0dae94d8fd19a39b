//! Client error types.

use brandybot_core::BrandyError;

/// Errors that can occur when using the BrandyBot client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Missing, invalid or expired ID token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The resource does not exist or belongs to someone else.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server's rate limit was exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Rejected locally before a request was sent.
    #[error(transparent)]
    Domain(#[from] BrandyError),
}

impl ClientError {
    /// HTTP status of a server-side error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}
