//! Service configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::imgbb::UPLOAD_TIMEOUT;
use crate::llm::LLM_TIMEOUT;

/// Local development origins always allowed by CORS.
pub const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// Deployment environment (`APP_ENV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
    /// Automated tests.
    Test,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Errors raised by [`ServiceConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable required in production is unset.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// The request timeout would cut off a logo generation.
    #[error("REQUEST_TIMEOUT_SECONDS ({request}s) must exceed the {budget}s a logo generation may take")]
    RequestTimeoutTooShort {
        /// Configured request timeout in seconds.
        request: u64,
        /// Worst-case generation time in seconds.
        budget: u64,
    },
}

/// Firebase identity provider settings.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Project id; tokens must carry it as audience.
    pub project_id: Option<String>,
    /// Web API key used for Identity Toolkit calls.
    pub api_key: Option<String>,
    /// JWKS endpoint for ID-token signing keys.
    pub jwks_url: String,
    /// Identity Toolkit base URL.
    pub identity_toolkit_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            jwks_url: "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com".into(),
            identity_toolkit_url: "https://identitytoolkit.googleapis.com".into(),
        }
    }
}

/// LLM provider settings. Gemini is tried first, then OpenAI.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Gemini API base URL.
    pub gemini_api_url: String,
    /// Gemini model.
    pub gemini_model: String,
    /// OpenAI API key.
    pub openai_api_key: Option<String>,
    /// OpenAI API base URL.
    pub openai_api_url: String,
    /// OpenAI model.
    pub openai_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_url: "https://generativelanguage.googleapis.com".into(),
            gemini_model: "gemini-1.5-flash".into(),
            openai_api_key: None,
            openai_api_url: "https://api.openai.com".into(),
            openai_model: "gpt-3.5-turbo".into(),
        }
    }
}

/// Rate limiting settings.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,
    /// Requests per window for the general API.
    pub max_requests: u32,
    /// Requests per window for the auth endpoints.
    pub auth_max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 15 * 60 * 1000,
            max_requests: 100,
            auth_max_requests: 5,
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deployment environment.
    pub environment: Environment,

    /// Address to listen on (default: "0.0.0.0:5000").
    pub listen_addr: String,

    /// PostgreSQL URL; the in-memory store is used when unset outside production.
    pub database_url: Option<String>,

    /// Maximum pooled database connections.
    pub database_max_connections: u32,

    /// Legacy document store directory.
    pub legacy_data_dir: Option<String>,

    /// Copy the legacy store into the relational store at startup.
    pub migrate_legacy: bool,

    /// Frontend URL, always allowed by CORS.
    pub frontend_url: String,

    /// Extra CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Identity provider.
    pub firebase: FirebaseConfig,

    /// AI image service base URL.
    pub ai_service_url: String,

    /// AI image service timeout in seconds.
    pub ai_timeout_seconds: u64,

    /// LLM providers.
    pub llm: LlmConfig,

    /// `ImgBB` API key.
    pub imgbb_api_key: Option<String>,

    /// `ImgBB` API base URL.
    pub imgbb_api_url: String,

    /// remove.bg API key.
    pub remove_bg_api_key: Option<String>,

    /// remove.bg API base URL.
    pub remove_bg_api_url: String,

    /// Rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Firebase secrets file structure.
#[derive(Debug, Deserialize)]
struct FirebaseSecrets {
    project_id: String,
    #[serde(default)]
    api_key: Option<String>,
}

/// Third-party provider secrets file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderSecrets {
    gemini_api_key: Option<String>,
    openai_api_key: Option<String>,
    imgbb_api_key: Option<String>,
    remove_bg_api_key: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let firebase = load_firebase_secrets();
        let providers = load_provider_secrets();

        let listen_addr = env("LISTEN_ADDR")
            .or_else(|| env("PORT").map(|port| format!("0.0.0.0:{port}")))
            .unwrap_or(defaults.listen_addr);

        Self {
            environment: env("APP_ENV").map_or(defaults.environment, |v| Environment::parse(&v)),
            listen_addr,
            database_url: env("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            legacy_data_dir: env("LEGACY_DATA_DIR"),
            migrate_legacy: env("MIGRATE_LEGACY").is_some_and(|v| v == "1" || v == "true"),
            frontend_url: env("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_origins: env("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            firebase: FirebaseConfig {
                project_id: firebase.0,
                api_key: firebase.1,
                jwks_url: env("FIREBASE_JWKS_URL").unwrap_or(defaults.firebase.jwks_url),
                identity_toolkit_url: env("FIREBASE_IDENTITY_TOOLKIT_URL")
                    .unwrap_or(defaults.firebase.identity_toolkit_url),
            },
            ai_service_url: env("AI_SERVICE_URL").unwrap_or(defaults.ai_service_url),
            ai_timeout_seconds: parsed("AI_TIMEOUT_SECONDS").unwrap_or(defaults.ai_timeout_seconds),
            llm: LlmConfig {
                gemini_api_key: providers.gemini_api_key,
                gemini_api_url: env("GEMINI_API_URL").unwrap_or(defaults.llm.gemini_api_url),
                gemini_model: env("GEMINI_MODEL").unwrap_or(defaults.llm.gemini_model),
                openai_api_key: providers.openai_api_key,
                openai_api_url: env("OPENAI_API_URL").unwrap_or(defaults.llm.openai_api_url),
                openai_model: env("OPENAI_MODEL").unwrap_or(defaults.llm.openai_model),
            },
            imgbb_api_key: providers.imgbb_api_key,
            imgbb_api_url: env("IMGBB_API_URL").unwrap_or(defaults.imgbb_api_url),
            remove_bg_api_key: providers.remove_bg_api_key,
            remove_bg_api_url: env("REMOVE_BG_API_URL").unwrap_or(defaults.remove_bg_api_url),
            rate_limit: RateLimitConfig {
                window_ms: parsed("RATE_LIMIT_WINDOW_MS").unwrap_or(defaults.rate_limit.window_ms),
                max_requests: parsed("RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.rate_limit.max_requests),
                auth_max_requests: parsed("AUTH_RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.rate_limit.auth_max_requests),
            },
            max_body_bytes: parsed("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: parsed("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Check that the request timeout outlasts a logo generation and that
    /// production deployments have a database and identity provider.
    ///
    /// # Errors
    ///
    /// Returns the first misconfigured or missing required variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budget = self.generation_budget().as_secs();
        if self.request_timeout_seconds <= budget {
            return Err(ConfigError::RequestTimeoutTooShort {
                request: self.request_timeout_seconds,
                budget,
            });
        }
        if self.environment != Environment::Production {
            return Ok(());
        }
        if self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.firebase.project_id.is_none() {
            return Err(ConfigError::Missing("FIREBASE_PROJECT_ID"));
        }
        Ok(())
    }

    /// Worst-case duration of a logo generation: one LLM call per provider
    /// (at least one), the AI service call and the image upload.
    #[must_use]
    pub fn generation_budget(&self) -> Duration {
        let providers = u32::from(self.llm.gemini_api_key.is_some())
            + u32::from(self.llm.openai_api_key.is_some());
        LLM_TIMEOUT * providers.max(1)
            + Duration::from_secs(self.ai_timeout_seconds)
            + UPLOAD_TIMEOUT
    }

    /// Origins allowed by CORS: the frontend, local dev servers and `CORS_ORIGINS`.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.trim_end_matches('/').to_string()];
        origins.extend(LOCAL_ORIGINS.iter().map(ToString::to_string));
        origins.extend(self.cors_origins.iter().cloned());
        let mut seen = std::collections::HashSet::new();
        origins.retain(|o| seen.insert(o.clone()));
        origins
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env(key).and_then(|v| v.trim().parse().ok())
}

/// Load Firebase settings from file or environment.
fn load_firebase_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [".secrets/firebase.json", "../.secrets/firebase.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<FirebaseSecrets>(path) {
            tracing::info!(path = %path, "Loaded Firebase secrets from file");
            return (Some(secrets.project_id), secrets.api_key.or_else(|| env("FIREBASE_API_KEY")));
        }
    }

    tracing::debug!("Firebase secrets file not found, using environment variables");
    (env("FIREBASE_PROJECT_ID"), env("FIREBASE_API_KEY"))
}

/// Load third-party API keys from file, falling back per key to the environment.
fn load_provider_secrets() -> ProviderSecrets {
    let secret_paths = [".secrets/providers.json", "../.secrets/providers.json"];

    let mut from_file = ProviderSecrets::default();
    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<ProviderSecrets>(path) {
            tracing::info!(path = %path, "Loaded provider secrets from file");
            from_file = secrets;
            break;
        }
    }

    ProviderSecrets {
        gemini_api_key: from_file.gemini_api_key.or_else(|| env("GEMINI_API_KEY")),
        openai_api_key: from_file.openai_api_key.or_else(|| env("OPENAI_API_KEY")),
        imgbb_api_key: from_file.imgbb_api_key.or_else(|| env("IMGBB_API_KEY")),
        remove_bg_api_key: from_file.remove_bg_api_key.or_else(|| env("REMOVE_BG_API_KEY")),
    }
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            listen_addr: "0.0.0.0:5000".into(),
            database_url: None,
            database_max_connections: 10,
            legacy_data_dir: None,
            migrate_legacy: false,
            frontend_url: "http://localhost:5173".into(),
            cors_origins: Vec::new(),
            firebase: FirebaseConfig::default(),
            ai_service_url: "http://localhost:8000".into(),
            ai_timeout_seconds: 120,
            llm: LlmConfig::default(),
            imgbb_api_key: None,
            imgbb_api_url: "https://api.imgbb.com".into(),
            remove_bg_api_key: None,
            remove_bg_api_url: "https://api.remove.bg".into(),
            rate_limit: RateLimitConfig::default(),
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_seconds: 360,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_requires_database_and_project() {
        let mut config = ServiceConfig {
            environment: Environment::Production,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        config.database_url = Some("postgres://localhost/brandybot".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("FIREBASE_PROJECT_ID"))
        ));

        config.firebase.project_id = Some("brandybot".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn development_runs_without_database() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn request_timeout_must_outlast_generation() {
        let mut config = ServiceConfig {
            ai_timeout_seconds: 120,
            request_timeout_seconds: 180,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RequestTimeoutTooShort {
                request: 180,
                budget: 240
            })
        ));

        config.request_timeout_seconds = 241;
        assert!(config.validate().is_ok());

        config.llm.gemini_api_key = Some("gemini".into());
        config.llm.openai_api_key = Some("openai".into());
        assert_eq!(config.generation_budget(), Duration::from_secs(300));
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_cover_both_llm_providers() {
        let mut config = ServiceConfig::default();
        config.llm.gemini_api_key = Some("gemini".into());
        config.llm.openai_api_key = Some("openai".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn allowed_origins_include_local_dev_without_duplicates() {
        let config = ServiceConfig {
            frontend_url: "http://localhost:5173/".into(),
            cors_origins: vec!["https://brandybot.app".into(), "http://localhost:3000".into()],
            ..ServiceConfig::default()
        };
        let origins = config.allowed_origins();
        assert_eq!(origins[0], "http://localhost:5173");
        assert!(origins.contains(&"https://brandybot.app".to_string()));
        assert_eq!(origins.len(), 5);
    }

    #[test]
    fn environment_parsing_is_lenient() {
        assert_eq!(Environment::parse("Production"), Environment::Production);
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }
}
