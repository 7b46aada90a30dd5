use thiserror::Error;

/// Errors returned by the Nominatim and OSRM clients.
#[derive(Debug, Error)]
pub enum OsmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the service.
    #[error("rate limited by {service} (retry after {retry_after_secs}s)")]
    RateLimited {
        service: &'static str,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {service}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    /// The service answered with an application-level error body.
    #[error("{service} error {code}: {message}")]
    Service {
        service: &'static str,
        code: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid coordinate in {context}: {value}")]
    InvalidCoordinate { context: String, value: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
