use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads `STOREFINDER_*` variables after loading a `.env` file, if any.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] but only sees the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Every variable has a default, so an empty environment yields a working
/// configuration pointed at the public OSM services.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;
    let bind_addr: SocketAddr = parse_var(&lookup, "STOREFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default(
        "STOREFINDER_STORES_PATH",
        "./config/stores.yaml",
    ));

    let nominatim_url = or_default(
        "STOREFINDER_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org",
    );
    let osrm_url = or_default("STOREFINDER_OSRM_URL", "https://router.project-osrm.org");
    let country_codes = or_default("STOREFINDER_COUNTRY_CODES", "br");
    let user_agent = or_default("STOREFINDER_USER_AGENT", "storefinder/0.1 (store-locator)");

    let http_timeout_secs = parse_var(&lookup, "STOREFINDER_HTTP_TIMEOUT_SECS", "10")?;
    let max_retries = parse_var(&lookup, "STOREFINDER_MAX_RETRIES", "1")?;
    let retry_backoff_base_ms = parse_var(&lookup, "STOREFINDER_RETRY_BACKOFF_BASE_MS", "250")?;

    let autocomplete_debounce_ms =
        parse_var(&lookup, "STOREFINDER_AUTOCOMPLETE_DEBOUNCE_MS", "400")?;
    let autocomplete_min_chars = parse_var(&lookup, "STOREFINDER_AUTOCOMPLETE_MIN_CHARS", "3")?;
    let suggestion_limit: usize = parse_var(&lookup, "STOREFINDER_SUGGESTION_LIMIT", "5")?;
    if suggestion_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_SUGGESTION_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let search_bias_degrees = parse_degrees(&lookup, "STOREFINDER_SEARCH_BIAS_DEGREES", "0.5")?;
    let suggest_bias_degrees = parse_degrees(&lookup, "STOREFINDER_SUGGEST_BIAS_DEGREES", "1.0")?;
    let notice_dismiss_ms = parse_var(&lookup, "STOREFINDER_NOTICE_DISMISS_MS", "3000")?;
    let rate_limit_per_minute = parse_var(&lookup, "STOREFINDER_RATE_LIMIT_PER_MINUTE", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        stores_path,
        nominatim_url,
        osrm_url,
        country_codes,
        user_agent,
        http_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        autocomplete_debounce_ms,
        autocomplete_min_chars,
        suggestion_limit,
        search_bias_degrees,
        suggest_bias_degrees,
        notice_dismiss_ms,
        rate_limit_per_minute,
    })
}

fn parse_var<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Bias box sizes must be positive and finite.
fn parse_degrees<F>(lookup: &F, var: &str, default: &str) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let degrees: f64 = parse_var(lookup, var, default)?;
    if !degrees.is_finite() || degrees <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be a positive number of degrees, got {degrees}"),
        });
    }
    Ok(degrees)
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
