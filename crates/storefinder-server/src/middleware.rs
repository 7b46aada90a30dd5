use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id, stored as a request extension and echoed in `x-request-id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct Window {
    opened: Instant,
    used: usize,
}

/// Fixed-window limiter in front of the routes that reach Nominatim or OSRM.
/// Public Nominatim allows roughly one request per second per client.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    capacity: usize,
    period: Duration,
    window: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(capacity: usize, period: Duration) -> Self {
        Self {
            capacity,
            period,
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(capacity: usize) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Takes one slot, or returns how long until the window reopens.
    async fn try_acquire(&self) -> Result<(), Duration> {
        let mut window = self.window.lock().await;
        let age = window.opened.elapsed();
        if age >= self.period {
            *window = Window {
                opened: Instant::now(),
                used: 0,
            };
        } else if window.used >= self.capacity {
            return Err(self.period - age);
        }
        window.used += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` when present and non-blank, otherwise a
/// fresh `UUIDv4`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some(given) if !given.is_empty() => given.to_owned(),
        _ => Uuid::new_v4().to_string(),
    };
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

/// Rejects with 429 and `Retry-After` once the window is used up.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if let Err(wait) = limiter.try_acquire().await {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();
        tracing::warn!(
            path = %req.uri().path(),
            retry_after_secs = wait.as_secs(),
            "rate limit exceeded"
        );
        let mut res =
            ApiError::new(request_id, "rate_limited", "too many lookups, try again shortly")
                .into_response();
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(wait.as_secs().max(1)));
        return res;
    }

    next.run(req).await
}
