//! Per-client token-bucket rate limiting.
//!
//! Each limiter allows a burst of `max_requests` and refills at
//! `max_requests` per window, keyed by client IP.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;
use crate::error::ApiError;

/// Rejection message for the general API limiter.
pub const API_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Rejection message for the auth limiter.
pub const AUTH_LIMIT_MESSAGE: &str = "Too many authentication attempts, please try again later.";

/// Key for requests without a resolvable client address.
const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
        }
    }

    fn try_consume(&mut self, rate: f64, capacity: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;

        self.tokens = (self.tokens + elapsed * rate).min(capacity);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// A keyed token-bucket limiter.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    rate: f64,
    capacity: f64,
    message: &'static str,
}

impl RateLimiter {
    /// Allow `max_requests` per `window`, rejecting with `message`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration, message: &'static str) -> Self {
        let capacity = f64::from(max_requests.max(1));
        let window_secs = window.as_secs_f64().max(f64::EPSILON);
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            rate: capacity / window_secs,
            capacity,
            message,
        }
    }

    /// Take one token for `key`.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity));
        bucket.try_consume(self.rate, self.capacity)
    }

    /// Drop buckets idle for longer than `max_idle`.
    pub async fn purge_stale(&self, max_idle: Duration) {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();
        buckets.retain(|_, bucket| now.duration_since(bucket.last_refill) < max_idle);
    }
}

/// The general API limiter and the stricter auth limiter.
#[derive(Clone)]
pub struct RateLimits {
    /// General API bucket.
    pub api: RateLimiter,
    /// Auth endpoint bucket.
    pub auth: RateLimiter,
}

impl RateLimits {
    /// Build both limiters from configuration.
    #[must_use]
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let window = Duration::from_millis(config.window_ms);
        Self {
            api: RateLimiter::new(config.max_requests, window, API_LIMIT_MESSAGE),
            auth: RateLimiter::new(config.auth_max_requests, window, AUTH_LIMIT_MESSAGE),
        }
    }
}

/// Middleware rejecting requests once the client's bucket is empty.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_client_ip(&req).map_or_else(|| UNKNOWN_CLIENT.to_string(), |ip| ip.to_string());

    if !limiter.check(&key).await {
        tracing::warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
        return Err(ApiError::TooManyRequests(limiter.message));
    }

    Ok(next.run(req).await)
}

/// Try `ConnectInfo` first, then `X-Forwarded-For`, then `X-Real-IP`.
fn extract_client_ip<B>(req: &axum::http::Request<B>) -> Option<IpAddr> {
    if let Some(connect_info) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(connect_info.0.ip());
    }

    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            if let Ok(ip) = value.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    None
}
