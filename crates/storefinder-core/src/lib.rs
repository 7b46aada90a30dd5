pub mod app_config;
pub mod config;
pub mod geo;
pub mod nearest;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_distance_m, Bounds, LatLng};
pub use nearest::{nearest_store, Nearest};
pub use stores::{load_stores, parse_stores, Store, StoresFormat};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML stores file {path}: {source}")]
    StoresYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON stores file {path}: {source}")]
    StoresJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stores validation failed: {0}")]
    Validation(String),
}
