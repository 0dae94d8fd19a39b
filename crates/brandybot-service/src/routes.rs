//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{self, auth, brands, chat, health, logos, mockups, users, utils};
use crate::rate_limit::rate_limit;
use crate::state::AppState;

/// Maximum concurrent requests for authenticated API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' 'unsafe-inline'; script-src 'self'; img-src 'self' data: https:";

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Service banner
/// - `GET /health` - Health check
///
/// ## Shared (no token, general rate limit)
/// - `GET /api/brands/public/:share_link` - Published brand
///
/// ## Auth (identity token, strict rate limit)
/// - `POST /api/auth/sync` - Sync profile after sign-in
/// - `GET /api/auth/me` - Current user
///
/// ## API (identity token, general rate limit)
/// - `/api/users/*` - Profile and account
/// - `/api/logos/*` - Logo generation and history
/// - `/api/brands/*` - Brand CRUD, sharing and guidelines
/// - `/api/mockups/*` - Mockup generation and templates
/// - `POST /api/chat/message` - Branding consultant chat
/// - `POST /api/utils/remove-bg` - Background removal
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let origins = state.config.allowed_origins();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let limits = state.limits.clone();

    let cors = build_cors_layer(&origins);

    let state = Arc::new(state);

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let shared_routes = Router::new()
        .route("/api/brands/public/:share_link", get(brands::public))
        .route_layer(from_fn_with_state(limits.api.clone(), rate_limit));

    let auth_routes = Router::new()
        .route("/api/auth/sync", post(auth::sync))
        .route("/api/auth/me", get(auth::me))
        .route_layer(from_fn_with_state(limits.auth, rate_limit));

    let api_routes = Router::new()
        // Users
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users/account", delete(users::delete_account))
        // Logos
        .route("/api/logos/generate", post(logos::generate))
        .route("/api/logos/history", get(logos::history))
        .route("/api/logos/stats", get(logos::stats))
        .route("/api/logos/:id", get(logos::get))
        .route("/api/logos/:id/rate", post(logos::rate))
        .route("/api/logos/:id/download", post(logos::download))
        // Brands
        .route("/api/brands", post(brands::create).get(brands::list))
        .route(
            "/api/brands/guidelines/generate",
            post(brands::generate_guidelines),
        )
        .route(
            "/api/brands/:id",
            get(brands::get).put(brands::update).delete(brands::delete),
        )
        .route("/api/brands/:id/share", post(brands::share))
        .route("/api/brands/:id/archive", post(brands::archive))
        .route("/api/brands/:id/activate", post(brands::activate))
        .route(
            "/api/brands/:id/guidelines",
            post(brands::regenerate_guidelines),
        )
        // Mockups
        .route("/api/mockups/generate", post(mockups::generate))
        .route("/api/mockups/templates", get(mockups::templates))
        // Chat
        .route("/api/chat/message", post(chat::message))
        // Utilities
        .route("/api/utils/remove-bg", post(utils::remove_bg))
        .route_layer(from_fn_with_state(limits.api, rate_limit))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .merge(public_routes)
        .merge(shared_routes)
        .merge(auth_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    request_timeout_seconds,
                ))),
        )
        .layer(security_header(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(security_header(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(security_header(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(security_header(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .with_state(state)
}

/// Turn timeout middleware errors into API errors.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {err}"))
    }
}

fn security_header(name: HeaderName, value: HeaderValue) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, value)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}
