//! Coordinates, bounding boxes and great-circle distance.
//!
//! All angles are WGS84 degrees. Distances are metres on a sphere with the
//! mean Earth radius, which is accurate to well under 1% at city scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Earth's mean radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    fn to_radians(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lon.to_radians())
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"`, the format used on the command line.
impl FromStr for LatLng {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LON but got '{s}'"))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
        let point = Self::new(lat, lon);
        if !point.is_valid() {
            return Err(format!("coordinate out of range: {point}"));
        }
        Ok(point)
    }
}

/// Great-circle distance in metres using the haversine formula.
#[must_use]
pub fn haversine_distance_m(from: LatLng, to: LatLng) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box covering every point, or `None` for no points.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    south: p.lat,
                    west: p.lon,
                    north: p.lat,
                    east: p.lon,
                },
                Some(b) => Self {
                    south: b.south.min(p.lat),
                    west: b.west.min(p.lon),
                    north: b.north.max(p.lat),
                    east: b.east.max(p.lon),
                },
            })
        })
    }

    /// Square box extending `half_side_degrees` from `center` in every direction.
    #[must_use]
    pub fn square(center: LatLng, half_side_degrees: f64) -> Self {
        Self {
            south: center.lat - half_side_degrees,
            west: center.lon - half_side_degrees,
            north: center.lat + half_side_degrees,
            east: center.lon + half_side_degrees,
        }
    }

    #[must_use]
    pub fn contains(&self, p: LatLng) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lon)
    }
}
