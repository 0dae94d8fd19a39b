//! Client for the external image generation service.
//!
//! The service renders logos from a text prompt (returned as base64 PNG) and
//! applies logos onto product templates (returned as a hosted URL). Calls are
//! plain HTTP with a long static timeout; there is no retry or queuing.

pub mod client;
pub mod types;

pub use client::{AiClient, AiError};
pub use types::*;
