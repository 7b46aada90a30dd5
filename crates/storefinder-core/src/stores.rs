use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::ConfigError;

/// A physical store from the dataset.
///
/// Field aliases accept the Portuguese keys found in older store files
/// (`nome`, `endereco`, `end`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "endereco", alias = "end")]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Store {
    /// The store position, or `None` when coordinates are missing or out of range.
    #[must_use]
    pub fn position(&self) -> Option<LatLng> {
        let point = LatLng::new(self.latitude?, self.longitude?);
        point.is_valid().then_some(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoresFormat {
    Yaml,
    Json,
}

impl StoresFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Either a bare list of stores or `{ stores: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoresFile {
    Wrapped { stores: Vec<Store> },
    Bare(Vec<Store>),
}

impl StoresFile {
    fn into_stores(self) -> Vec<Store> {
        match self {
            Self::Wrapped { stores } | Self::Bare(stores) => stores,
        }
    }
}

/// Load and validate the store dataset.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<Vec<Store>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores = parse_stores(
        &content,
        StoresFormat::from_path(path),
        &path.display().to_string(),
    )?;

    let located = stores.iter().filter(|s| s.position().is_some()).count();
    tracing::info!(
        path = %path.display(),
        total = stores.len(),
        located,
        "loaded store dataset"
    );

    Ok(stores)
}

/// Parse and validate dataset content. `origin` only labels errors.
///
/// # Errors
///
/// Returns `ConfigError` on malformed content or a store without a name.
pub fn parse_stores(
    content: &str,
    format: StoresFormat,
    origin: &str,
) -> Result<Vec<Store>, ConfigError> {
    let file: StoresFile = match format {
        StoresFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::StoresYaml {
                path: origin.to_string(),
                source: e,
            })?
        }
        StoresFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::StoresJson {
                path: origin.to_string(),
                source: e,
            })?
        }
    };

    let stores = file.into_stores();
    validate_stores(&stores)?;
    Ok(stores)
}

fn validate_stores(stores: &[Store]) -> Result<(), ConfigError> {
    if stores.is_empty() {
        tracing::warn!("store dataset is empty; every search will report no stores");
    }

    for (index, store) in stores.iter().enumerate() {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store #{index} has an empty name"
            )));
        }

        if store.position().is_none() {
            tracing::warn!(
                store = %store.name,
                latitude = ?store.latitude,
                longitude = ?store.longitude,
                "store has no usable coordinates; it will be skipped by the nearest-store scan"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
