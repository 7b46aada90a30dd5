//! HTTP client for the OSRM `/route` service.

use reqwest::{Client, Url};
use storefinder_core::LatLng;

use crate::error::OsmError;
use crate::http::{build_client, get_json, parse_base_url, ClientSettings};
use crate::retry::retry_with_backoff;
use crate::types::{RawRoute, RawRouteResponse, Route};

const SERVICE: &str = "osrm";

/// OSRM codes meaning "no route between these points" rather than a failure.
const NO_ROUTE_CODES: &[&str] = &["NoRoute", "NoSegment"];

/// Client for an OSRM instance.
pub struct OsrmClient {
    client: Client,
    base_url: Url,
    profile: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl OsrmClient {
    /// Creates a client for the `driving` profile of the instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`OsmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(settings: &ClientSettings, base_url: &str) -> Result<Self, OsmError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: parse_base_url(base_url)?,
            profile: "driving".to_owned(),
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Requests driving routes from `from` to `to` with full GeoJSON geometry.
    ///
    /// Returns an empty vector when OSRM finds no route (`NoRoute`,
    /// `NoSegment`) or every route comes back without geometry.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Service`] for any other non-`Ok` OSRM code.
    /// - [`OsmError::Http`], [`OsmError::RateLimited`] or
    ///   [`OsmError::UnexpectedStatus`] on transport failure after retries.
    /// - [`OsmError::Deserialize`] if the body does not match the expected shape.
    pub async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<Route>, OsmError> {
        let url = self.route_url(from, to)?;

        let body = retry_with_backoff(SERVICE, self.max_retries, self.backoff_base_ms, || {
            get_json(&self.client, &url, SERVICE)
        })
        .await?;

        let response: RawRouteResponse =
            serde_json::from_value(body).map_err(|e| OsmError::Deserialize {
                context: format!("route({from} -> {to})"),
                source: e,
            })?;

        if NO_ROUTE_CODES.contains(&response.code.as_str()) {
            tracing::debug!(code = %response.code, %from, %to, "osrm found no route");
            return Ok(Vec::new());
        }
        if response.code != "Ok" {
            return Err(OsmError::Service {
                service: SERVICE,
                code: response.code,
                message: response.message.unwrap_or_default(),
            });
        }

        let routes: Vec<Route> = response
            .routes
            .into_iter()
            .filter_map(RawRoute::into_route)
            .collect();

        tracing::debug!(%from, %to, routes = routes.len(), "osrm route completed");
        Ok(routes)
    }

    /// `{base}route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`
    fn route_url(&self, from: LatLng, to: LatLng) -> Result<Url, OsmError> {
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            self.profile, from.lon, from.lat, to.lon, to.lat
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| OsmError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson");
        Ok(url)
    }
}
