use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub stores_path: PathBuf,
    /// Base URL of the Nominatim geocoding service.
    pub nominatim_url: String,
    /// Base URL of the OSRM routing service.
    pub osrm_url: String,
    /// Comma-separated ISO 3166-1 alpha-2 codes passed as `countrycodes`.
    pub country_codes: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub autocomplete_debounce_ms: u64,
    pub autocomplete_min_chars: usize,
    pub suggestion_limit: usize,
    /// Half side, in degrees, of the box around the user that biases searches.
    pub search_bias_degrees: f64,
    /// Same as `search_bias_degrees`, for autocomplete requests.
    pub suggest_bias_degrees: f64,
    pub notice_dismiss_ms: u64,
    pub rate_limit_per_minute: usize,
}
