//! The lookup chain behind every search: geocode, nearest store, route.

use serde::Serialize;
use storefinder_core::{nearest_store, AppConfig, Bounds, LatLng, Store};
use storefinder_osm::{OsmError, Route, SearchQuery};

use crate::error::LocateError;
use crate::label::{suggestions_from_places, Suggestion};
use crate::lookup::{Geocoder, RouteService};

/// Tunables of the lookup chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorSettings {
    /// Half side, in degrees, of the preferred box around the user for searches.
    pub search_bias_degrees: f64,
    /// Same for autocomplete requests.
    pub suggest_bias_degrees: f64,
    /// Shorter input gets no suggestions. Counted in characters.
    pub min_suggest_chars: usize,
    pub suggestion_limit: usize,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            search_bias_degrees: 0.5,
            suggest_bias_degrees: 1.0,
            min_suggest_chars: 3,
            suggestion_limit: 5,
        }
    }
}

impl LocatorSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_bias_degrees: config.search_bias_degrees,
            suggest_bias_degrees: config.suggest_bias_degrees,
            min_suggest_chars: config.autocomplete_min_chars,
            suggestion_limit: config.suggestion_limit,
        }
    }
}

/// The nearest store to a geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Where the address was geocoded to.
    pub point: LatLng,
    pub store: Store,
    /// Great-circle distance from `point` to the store.
    pub distance_m: f64,
}

impl SearchResult {
    /// Distance in kilometres with one decimal, e.g. `"3.4 km"`.
    #[must_use]
    pub fn distance_km_label(&self) -> String {
        format!("{:.1} km", self.distance_m / 1000.0)
    }

    /// Google Maps directions link to the store, for handing off to a
    /// navigation app.
    #[must_use]
    pub fn directions_url(&self) -> Option<String> {
        self.store.position().map(|p| {
            format!(
                "https://www.google.com/maps/dir/?api=1&destination={},{}",
                p.lat, p.lon
            )
        })
    }
}

/// What to show between the address and the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutePlan {
    Full(Route),
    /// The router failed or found nothing. `bounds` covers just the endpoints.
    Degraded { bounds: Bounds },
}

impl RoutePlan {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Full(route) => route.bounds,
            Self::Degraded { bounds } => *bounds,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Geocoder, router and store dataset behind a search.
pub struct Locator<G, R> {
    geocoder: G,
    router: R,
    stores: Vec<Store>,
    settings: LocatorSettings,
}

impl<G: Geocoder, R: RouteService> Locator<G, R> {
    pub fn new(geocoder: G, router: R, stores: Vec<Store>, settings: LocatorSettings) -> Self {
        Self {
            geocoder,
            router,
            stores,
            settings,
        }
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn settings(&self) -> &LocatorSettings {
        &self.settings
    }

    /// Whether `input` is long enough to ask for suggestions.
    #[must_use]
    pub fn is_suggestible(&self, input: &str) -> bool {
        input.trim().chars().count() >= self.settings.min_suggest_chars
    }

    /// Geocodes `input` to the top candidate, preferring the area around
    /// `near` when given.
    ///
    /// # Errors
    ///
    /// - [`LocateError::EmptyInput`] for blank input, without any request.
    /// - [`LocateError::NotFound`] when the geocoder has no candidate.
    /// - [`LocateError::Lookup`] when the request fails.
    pub async fn geocode(&self, input: &str, near: Option<LatLng>) -> Result<LatLng, LocateError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(LocateError::EmptyInput);
        }

        let query = SearchQuery {
            text,
            limit: 1,
            viewbox: near.map(|p| Bounds::square(p, self.settings.search_bias_degrees)),
            address_details: false,
        };
        let places = self.geocoder.search(&query).await?;
        let place = places.into_iter().next().ok_or(LocateError::NotFound)?;

        tracing::debug!(input = text, point = %place.point, "address geocoded");
        Ok(place.point)
    }

    /// Picks the store closest to `point`.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::NoStores`] when no store has coordinates.
    pub fn nearest(&self, point: LatLng) -> Result<SearchResult, LocateError> {
        let nearest = nearest_store(point, &self.stores).ok_or(LocateError::NoStores)?;
        tracing::debug!(
            store = %nearest.store.name,
            distance_m = nearest.distance_m,
            "nearest store selected"
        );
        Ok(SearchResult {
            point,
            store: nearest.store.clone(),
            distance_m: nearest.distance_m,
        })
    }

    /// [`Locator::geocode`] followed by [`Locator::nearest`].
    ///
    /// # Errors
    ///
    /// See both steps.
    pub async fn find_nearest(
        &self,
        input: &str,
        near: Option<LatLng>,
    ) -> Result<SearchResult, LocateError> {
        let point = self.geocode(input, near).await?;
        self.nearest(point)
    }

    /// Address suggestions for partial input.
    ///
    /// Input below the minimum length yields an empty list without a request.
    ///
    /// # Errors
    ///
    /// Returns the geocoder's [`OsmError`] unchanged.
    pub async fn suggest(
        &self,
        input: &str,
        near: Option<LatLng>,
    ) -> Result<Vec<Suggestion>, OsmError> {
        if !self.is_suggestible(input) {
            return Ok(Vec::new());
        }
        let query = SearchQuery {
            text: input.trim(),
            limit: self.settings.suggestion_limit,
            viewbox: near.map(|p| Bounds::square(p, self.settings.suggest_bias_degrees)),
            address_details: true,
        };
        let places = self.geocoder.search(&query).await?;
        Ok(suggestions_from_places(
            &places,
            self.settings.suggestion_limit,
        ))
    }

    /// Driving route from `from` to `to`.
    ///
    /// Never fails: router errors and empty answers degrade to the box around
    /// both endpoints.
    pub async fn plan_route(&self, from: LatLng, to: LatLng) -> RoutePlan {
        let endpoints = Bounds::around([from, to]).unwrap_or_else(|| Bounds::square(from, 0.0));
        match self.router.route(from, to).await {
            Ok(routes) => match routes.into_iter().next() {
                Some(route) => RoutePlan::Full(route),
                None => {
                    tracing::warn!(%from, %to, "router returned no route, showing endpoints only");
                    RoutePlan::Degraded { bounds: endpoints }
                }
            },
            Err(e) => {
                tracing::warn!(
                    %from,
                    %to,
                    error = %e,
                    "route lookup failed, showing endpoints only"
                );
                RoutePlan::Degraded { bounds: endpoints }
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
