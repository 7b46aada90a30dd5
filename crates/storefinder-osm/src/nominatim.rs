//! HTTP client for the Nominatim `/search` endpoint.

use reqwest::{Client, Url};
use storefinder_core::Bounds;

use crate::error::OsmError;
use crate::http::{build_client, get_json, parse_base_url, ClientSettings};
use crate::retry::retry_with_backoff;
use crate::types::{Place, RawPlace};

const SERVICE: &str = "nominatim";

/// Parameters of one free-text search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery<'a> {
    pub text: &'a str,
    pub limit: usize,
    /// Preferred area. Results outside it are still returned (`bounded=0`).
    pub viewbox: Option<Bounds>,
    /// Request structured address fields (`addressdetails=1`).
    pub address_details: bool,
}

/// Client for a Nominatim instance.
///
/// Use [`NominatimClient::new`] with the public instance URL in production or
/// a wiremock server URL in tests.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    country_codes: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// Creates a client for the instance at `base_url`, restricted to
    /// `country_codes` (comma-separated; empty means worldwide).
    ///
    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`OsmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        settings: &ClientSettings,
        base_url: &str,
        country_codes: &str,
    ) -> Result<Self, OsmError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: parse_base_url(base_url)?,
            country_codes: country_codes.trim().to_owned(),
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Geocodes free text. Candidates keep Nominatim's ranking order; an
    /// empty vector means nothing matched.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Service`] if Nominatim returns an error body.
    /// - [`OsmError::Http`], [`OsmError::RateLimited`] or
    ///   [`OsmError::UnexpectedStatus`] on transport failure after retries.
    /// - [`OsmError::Deserialize`] if the response does not match the
    ///   expected shape. Single candidates with unusable coordinates are
    ///   dropped instead.
    pub async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<Place>, OsmError> {
        let url = self.search_url(query)?;

        let body = retry_with_backoff(SERVICE, self.max_retries, self.backoff_base_ms, || {
            get_json(&self.client, &url, SERVICE)
        })
        .await?;
        Self::check_api_error(&body)?;

        let raw: Vec<RawPlace> =
            serde_json::from_value(body).map_err(|e| OsmError::Deserialize {
                context: format!("search(q={})", query.text),
                source: e,
            })?;

        // A candidate with broken coordinates is skipped, not fatal.
        let places: Vec<Place> = raw
            .into_iter()
            .filter_map(|candidate| match candidate.into_place() {
                Ok(place) => Some(place),
                Err(e) => {
                    tracing::warn!(
                        query = query.text,
                        error = %e,
                        "skipping nominatim candidate"
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(
            query = query.text,
            candidates = places.len(),
            biased = query.viewbox.is_some(),
            "nominatim search completed"
        );
        Ok(places)
    }

    /// Builds the `/search` URL with percent-encoded query parameters.
    fn search_url(&self, query: &SearchQuery<'_>) -> Result<Url, OsmError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| OsmError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("q", query.text);
            if !self.country_codes.is_empty() {
                pairs.append_pair("countrycodes", &self.country_codes);
            }
            pairs.append_pair("limit", &query.limit.to_string());
            if query.address_details {
                pairs.append_pair("addressdetails", "1");
            }
            if let Some(b) = query.viewbox {
                // Nominatim wants x1,y1,x2,y2 = west,north,east,south.
                pairs.append_pair(
                    "viewbox",
                    &format!("{},{},{},{}", b.west, b.north, b.east, b.south),
                );
                pairs.append_pair("bounded", "0");
            }
        }
        Ok(url)
    }

    /// Nominatim reports errors as `{"error": "..."}` or
    /// `{"error": {"code": 400, "message": "..."}}`.
    fn check_api_error(body: &serde_json::Value) -> Result<(), OsmError> {
        let Some(error) = body.get("error") else {
            return Ok(());
        };
        let (code, message) = match error {
            serde_json::Value::String(msg) => ("error".to_owned(), msg.clone()),
            other => (
                other
                    .get("code")
                    .map_or_else(|| "error".to_owned(), ToString::to_string),
                other
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown error")
                    .to_owned(),
            ),
        };
        Err(OsmError::Service {
            service: SERVICE,
            code,
            message,
        })
    }
}
