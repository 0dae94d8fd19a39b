//! BrandyBot HTTP API Service.
//!
//! This crate provides the HTTP API behind the BrandyBot frontend, including:
//!
//! - User sync and profile management
//! - AI logo generation and logo history
//! - Brands, shareable brand pages and generated guidelines
//! - Product mockups, branding chat and background removal
//!
//! # Authentication
//!
//! Every `/api` route except public brand pages expects a Firebase ID token
//! as `Authorization: Bearer <token>`. The local user row is created on the
//! first authenticated request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Health and catalogue handlers need async for routing

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod imgbb;
pub mod llm;
pub mod rate_limit;
pub mod removebg;
pub mod routes;
pub mod state;

pub use ai::AiClient;
pub use auth::{AuthUser, FirebaseVerifier, Identity, IdentityProvider};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use llm::LlmClient;
pub use routes::create_router;
pub use state::AppState;
