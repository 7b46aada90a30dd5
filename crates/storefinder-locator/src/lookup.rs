//! Seams between the pipeline and the outside world.
//!
//! The pipeline only talks to these traits, so tests can swap the HTTP
//! clients for in-memory fakes.

use std::future::Future;

use storefinder_core::LatLng;
use storefinder_osm::{NominatimClient, OsmError, OsrmClient, Place, Route, SearchQuery};

use crate::error::PositionError;

/// Free-text geocoding.
pub trait Geocoder: Send + Sync {
    /// Returns candidates in ranking order. Empty means no match.
    fn search(
        &self,
        query: &SearchQuery<'_>,
    ) -> impl Future<Output = Result<Vec<Place>, OsmError>> + Send;
}

/// Driving routes between two points.
pub trait RouteService: Send + Sync {
    /// Returns candidate routes, best first. Empty means no route.
    fn route(
        &self,
        from: LatLng,
        to: LatLng,
    ) -> impl Future<Output = Result<Vec<Route>, OsmError>> + Send;
}

/// One-shot device position, best effort.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<LatLng, PositionError>> + Send;
}

impl Geocoder for NominatimClient {
    fn search(
        &self,
        query: &SearchQuery<'_>,
    ) -> impl Future<Output = Result<Vec<Place>, OsmError>> + Send {
        NominatimClient::search(self, query)
    }
}

impl RouteService for OsrmClient {
    fn route(
        &self,
        from: LatLng,
        to: LatLng,
    ) -> impl Future<Output = Result<Vec<Route>, OsmError>> + Send {
        OsrmClient::route(self, from, to)
    }
}

/// A position known up front, e.g. from a `--near` flag.
impl PositionSource for Option<LatLng> {
    async fn current_position(&self) -> Result<LatLng, PositionError> {
        match self {
            Some(p) if p.is_valid() => Ok(*p),
            Some(p) => Err(PositionError::Unavailable(format!("invalid position {p}"))),
            None => Err(PositionError::Denied),
        }
    }
}
