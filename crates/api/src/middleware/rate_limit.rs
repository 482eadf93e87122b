//! Rate limiting middleware for the public feedback endpoints.
//!
//! The feedback page is reachable without authentication, so the only stable
//! identity to limit on is the invitation token in the path. Each token gets
//! its own limiter.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use crate::app::AppState;

/// Type alias for the limiter kept per invitation token.
type TokenRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests, keyed by invitation token.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<TokenRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    fn get_or_create_limiter(&self, token: &str) -> Arc<TokenRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(token) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(token) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(30).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(token.to_string(), limiter.clone());
        limiter
    }

    /// Check whether a request for the given token should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds.
    pub fn check(&self, token: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(token);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that rate-limits the public feedback routes per token.
///
/// Applied to routes whose single path parameter is the invitation token.
pub async fn rate_limit_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        if let Err(retry_after) = rate_limiter.check(&token) {
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    response.headers_mut().insert(
        header::RETRY_AFTER,
        retry_after.to_string().parse().unwrap(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_first_request() {
        let state = RateLimiterState::new(30);
        assert!(state.check("token-a").is_ok());
    }

    #[test]
    fn test_limiter_exhaustion() {
        let state = RateLimiterState::new(1);

        assert!(state.check("token-a").is_ok());
        let result = state.check("token-a");
        assert!(result.is_err());
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_limiter_tokens_are_independent() {
        let state = RateLimiterState::new(1);

        assert!(state.check("token-a").is_ok());
        assert!(state.check("token-b").is_ok());
        assert!(state.check("token-a").is_err());
        assert!(state.check("token-b").is_err());
    }

    #[test]
    fn test_limiter_respects_quota() {
        let state = RateLimiterState::new(5);
        for i in 0..5 {
            assert!(state.check("token-a").is_ok(), "request {} should pass", i);
        }
        assert!(state.check("token-a").is_err());
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let state = RateLimiterState::new(30);
        let a = state.get_or_create_limiter("token-a");
        let b = state.get_or_create_limiter("token-a");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = rate_limited_response(30, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn test_debug_lists_active_limiters() {
        let state = RateLimiterState::new(30);
        state.check("token-a").unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("active_limiters"));
    }
}
