//! Shared HTTP plumbing for the OSM clients.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use storefinder_core::AppConfig;

use crate::error::OsmError;

/// Transport settings shared by both clients.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    pub user_agent: String,
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

pub(crate) fn build_client(settings: &ClientSettings) -> Result<Client, OsmError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Parses `base_url`, normalised to end with exactly one slash so that
/// [`Url::join`] appends to it instead of replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, OsmError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| OsmError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Sends a GET request and parses the body as JSON.
///
/// 4xx responses that carry a JSON object are returned as `Ok` so the caller
/// can read the service's own error description. Both Nominatim and OSRM
/// explain client errors that way.
///
/// # Errors
///
/// - [`OsmError::RateLimited`] on HTTP 429.
/// - [`OsmError::UnexpectedStatus`] on any other non-2xx without a JSON body.
/// - [`OsmError::Http`] on network failure.
/// - [`OsmError::Deserialize`] if a 2xx body is not valid JSON.
pub(crate) async fn get_json(
    client: &Client,
    url: &Url,
    service: &'static str,
) -> Result<serde_json::Value, OsmError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(OsmError::RateLimited {
            service,
            retry_after_secs,
        });
    }

    let body = response.text().await?;

    if !status.is_success() {
        if status.is_client_error() {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
        return Err(OsmError::UnexpectedStatus {
            service,
            status: status.as_u16(),
        });
    }

    serde_json::from_str(&body).map_err(|e| OsmError::Deserialize {
        context: format!("{service} response from {}", url.path()),
        source: e,
    })
}
