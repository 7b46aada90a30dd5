use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefinder_locator::view::{MSG_EMPTY_INPUT, MSG_FAILED, MSG_NOT_FOUND, MSG_NO_STORES};
use storefinder_locator::{LocateError, SearchResult, Suggestion};

use super::{parse_bias, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct LookupParams {
    #[serde(default)]
    pub q: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    #[serde(flatten)]
    pub result: SearchResult,
    /// Rounded distance for display, e.g. `"3.4 km"`.
    pub distance_label: String,
    pub directions_url: Option<String>,
}

impl From<SearchResult> for SearchData {
    fn from(result: SearchResult) -> Self {
        Self {
            distance_label: result.distance_km_label(),
            directions_url: result.directions_url(),
            result,
        }
    }
}

pub(super) fn reject_query(request_id: &str, rejection: &QueryRejection) -> ApiError {
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

fn map_locate_error(request_id: &str, err: &LocateError) -> ApiError {
    match err {
        LocateError::EmptyInput => ApiError::new(request_id, "validation_error", MSG_EMPTY_INPUT),
        LocateError::NotFound => ApiError::new(request_id, "not_found", MSG_NOT_FOUND),
        LocateError::NoStores => ApiError::new(request_id, "no_stores", MSG_NO_STORES),
        LocateError::Lookup(e) => {
            tracing::warn!(error = %e, "geocoding failed");
            ApiError::new(request_id, "upstream_error", MSG_FAILED)
        }
    }
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Query(params) = params.map_err(|e| reject_query(&req_id.0, &e))?;
    let near = parse_bias(&req_id.0, params.lat, params.lon)?;

    let result = state
        .locator
        .find_nearest(&params.q, near)
        .await
        .map_err(|e| map_locate_error(&req_id.0, &e))?;

    tracing::info!(
        store = %result.store.name,
        distance_m = result.distance_m,
        biased = near.is_some(),
        "search resolved"
    );
    Ok(ApiResponse::new(req_id.0, SearchData::from(result)))
}

pub(super) async fn suggest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Suggestion>>>, ApiError> {
    let Query(params) = params.map_err(|e| reject_query(&req_id.0, &e))?;
    let near = parse_bias(&req_id.0, params.lat, params.lon)?;

    let suggestions = state
        .locator
        .suggest(&params.q, near)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "autocomplete lookup failed");
            ApiError::new(req_id.0.clone(), "upstream_error", MSG_FAILED)
        })?;

    Ok(ApiResponse::new(req_id.0, suggestions))
}
