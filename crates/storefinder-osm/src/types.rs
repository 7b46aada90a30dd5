//! Nominatim and OSRM response types.
//!
//! `Raw*` types mirror the wire format and stay private to the crate; the
//! public [`Place`] and [`Route`] carry parsed coordinates.

use serde::{Deserialize, Serialize};
use storefinder_core::{Bounds, LatLng};

use crate::error::OsmError;

// ---------------------------------------------------------------------------
// Nominatim /search
// ---------------------------------------------------------------------------

/// Nominatim emits coordinates as strings in `format=json`; some mirrors
/// send plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCoordinate {
    Text(String),
    Number(f64),
}

impl RawCoordinate {
    fn parse(&self, context: &str) -> Result<f64, OsmError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| OsmError::InvalidCoordinate {
                    context: context.to_owned(),
                    value: s.clone(),
                }),
        }
    }
}

/// One candidate in a Nominatim `/search` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub lat: RawCoordinate,
    pub lon: RawCoordinate,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<PlaceAddress>,
}

impl RawPlace {
    pub(crate) fn into_place(self) -> Result<Place, OsmError> {
        let context = format!("place '{}'", self.display_name);
        let point = LatLng::new(self.lat.parse(&context)?, self.lon.parse(&context)?);
        if !point.is_valid() {
            return Err(OsmError::InvalidCoordinate {
                context,
                value: point.to_string(),
            });
        }
        Ok(Place {
            point,
            display_name: self.display_name,
            name: self.name.filter(|n| !n.trim().is_empty()),
            address: self.address.unwrap_or_default(),
        })
    }
}

/// Structured address fields, present with `addressdetails=1`.
///
/// Only the keys used for suggestion labels are kept; Nominatim sends many more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceAddress {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub pedestrian: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A geocoded candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub point: LatLng,
    pub display_name: String,
    pub name: Option<String>,
    pub address: PlaceAddress,
}

// ---------------------------------------------------------------------------
// OSRM /route
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RawRouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub geometry: RawGeometry,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// GeoJSON `LineString`; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

impl RawRoute {
    /// `None` when the geometry has no points.
    pub(crate) fn into_route(self) -> Option<Route> {
        let path: Vec<LatLng> = self
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| LatLng::new(lat, lon))
            .collect();
        let bounds = Bounds::around(path.iter().copied())?;
        Some(Route {
            path,
            bounds,
            distance_m: self.distance,
            duration_s: self.duration,
        })
    }
}

/// A driving route ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: Vec<LatLng>,
    /// Box covering the whole path.
    pub bounds: Bounds,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_place_accepts_string_and_number_coordinates() {
        let text: RawPlace =
            serde_json::from_str(r#"{"lat": "-23.5", "lon": "-46.6", "display_name": "X"}"#)
                .unwrap();
        let number: RawPlace =
            serde_json::from_str(r#"{"lat": -23.5, "lon": -46.6, "display_name": "X"}"#).unwrap();
        assert_eq!(
            text.into_place().unwrap().point,
            number.into_place().unwrap().point
        );
    }

    #[test]
    fn raw_place_rejects_unparseable_coordinate() {
        let raw: RawPlace =
            serde_json::from_str(r#"{"lat": "north-ish", "lon": "-46.6"}"#).unwrap();
        assert!(matches!(
            raw.into_place(),
            Err(OsmError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn blank_place_name_becomes_none() {
        let raw: RawPlace =
            serde_json::from_str(r#"{"lat": "0", "lon": "0", "name": ""}"#).unwrap();
        assert_eq!(raw.into_place().unwrap().name, None);
    }

    #[test]
    fn route_flips_geojson_axis_order() {
        let raw: RawRoute = serde_json::from_str(
            r#"{"geometry": {"type": "LineString", "coordinates": [[-46.6, -23.5], [-46.5, -23.4]]},
                "distance": 15000.5, "duration": 1200.0}"#,
        )
        .unwrap();
        let route = raw.into_route().unwrap();
        assert_eq!(route.path[0], LatLng::new(-23.5, -46.6));
        assert_eq!(route.bounds.north, -23.4);
        assert_eq!(route.bounds.west, -46.6);
        assert!((route.distance_m - 15000.5).abs() < f64::EPSILON);
    }

    #[test]
    fn route_without_points_is_none() {
        let raw: RawRoute =
            serde_json::from_str(r#"{"geometry": {"coordinates": []}}"#).unwrap();
        assert!(raw.into_route().is_none());
    }
}
