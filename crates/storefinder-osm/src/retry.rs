//! Back-off retries for the OSM clients.
//!
//! Only transient failures are retried: timeouts, connect errors, 5xx and
//! 429. A 429 that names a `Retry-After` waits at least that long.

use std::future::Future;
use std::time::Duration;

use crate::error::OsmError;

const MAX_DELAY_MS: u64 = 10_000;

pub(crate) fn is_retriable(err: &OsmError) -> bool {
    match err {
        OsmError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        OsmError::RateLimited { .. } => true,
        OsmError::UnexpectedStatus { status, .. } => *status >= 500,
        OsmError::Service { .. }
        | OsmError::Deserialize { .. }
        | OsmError::InvalidCoordinate { .. }
        | OsmError::InvalidBaseUrl { .. } => false,
    }
}

/// Sleep before retry number `retry` (1-based), without jitter.
///
/// Doubles from `base_ms`, capped at ten seconds. A server-sent
/// `Retry-After` overrides a shorter computed delay, under the same cap.
fn backoff_delay_ms(retry: u32, base_ms: u64, err: &OsmError) -> u64 {
    let exponential = base_ms.saturating_mul(1u64 << (retry - 1).min(10));
    let floor = match err {
        OsmError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    exponential.max(floor).min(MAX_DELAY_MS)
}

/// Spreads `delay_ms` over 75 % to 125 % of its value.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered(delay_ms: u64) -> u64 {
    let factor = 0.75 + rand::random::<f64>() * 0.5;
    (delay_ms as f64 * factor) as u64
}

/// Calls `attempt` until it succeeds, fails for good, or `max_retries`
/// extra calls have been spent. Interactive lookups keep `max_retries` low.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    service: &'static str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut attempt: F,
) -> Result<T, OsmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OsmError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;

        let delay_ms = jittered(backoff_delay_ms(retries, backoff_base_ms, &err));
        tracing::warn!(
            service,
            retry = retries,
            max_retries,
            delay_ms,
            error = %err,
            "transient upstream failure"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
