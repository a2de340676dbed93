use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::ThrottleConfig;

/// Outcome of a limiter check for one client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    Denied { retry_after: u64 },
}

/// Pluggable limiter seam; the middleware only sees the decision.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str) -> ThrottleDecision;
}

/// Counts requests per client key inside a fixed window.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    slots: Mutex<HashMap<String, WindowSlot>>,
}

struct WindowSlot {
    started: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &str) -> ThrottleDecision {
        let now = Instant::now();
        let mut slots = self.slots.lock().expect("throttle mutex poisoned");

        slots.retain(|_, slot| now.duration_since(slot.started) < self.window);

        let slot = slots.entry(key.to_string()).or_insert(WindowSlot {
            started: now,
            count: 0,
        });

        if slot.count >= self.max_requests {
            let remaining = self.window.saturating_sub(now.duration_since(slot.started));
            return ThrottleDecision::Denied {
                retry_after: remaining.as_secs().max(1),
            };
        }

        slot.count += 1;
        ThrottleDecision::Allowed
    }
}

/// Middleware applying the limiter to the wrapped route. Denied
/// requests get a countdown in both the header and the body.
pub async fn throttle(
    State(limiter): State<Arc<dyn RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limiter.check(&key) {
        ThrottleDecision::Allowed => next.run(request).await,
        ThrottleDecision::Denied { retry_after } => {
            let payload = json!({
                "success": false,
                "error": "Too many requests",
                "retryAfter": retry_after,
            });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(payload)).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
    }
}

fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
