use storefinder_osm::OsmError;
use thiserror::Error;

/// Ways a store search can end without a result.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The address was empty or whitespace. No request was sent.
    #[error("address is empty")]
    EmptyInput,

    #[error("address not found")]
    NotFound,

    /// No store in the dataset has usable coordinates.
    #[error("no stores with coordinates")]
    NoStores,

    #[error("lookup failed: {0}")]
    Lookup(#[from] OsmError),
}

/// Failure to obtain the device position.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    Denied,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}
