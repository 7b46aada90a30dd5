use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefinder_core::{Bounds, LatLng};
use storefinder_locator::RoutePlan;

use super::search::reject_query;
use super::{parse_point, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct RouteParams {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct RouteData {
    /// `true` when no route could be drawn and `bounds` covers the endpoints only.
    pub degraded: bool,
    pub bounds: Bounds,
    pub path: Vec<LatLng>,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

impl From<RoutePlan> for RouteData {
    fn from(plan: RoutePlan) -> Self {
        match plan {
            RoutePlan::Full(route) => Self {
                degraded: false,
                bounds: route.bounds,
                path: route.path,
                distance_m: Some(route.distance_m),
                duration_s: Some(route.duration_s),
            },
            RoutePlan::Degraded { bounds } => Self {
                degraded: true,
                bounds,
                path: Vec::new(),
                distance_m: None,
                duration_s: None,
            },
        }
    }
}

pub(super) async fn route(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<RouteParams>, QueryRejection>,
) -> Result<Json<ApiResponse<RouteData>>, ApiError> {
    let Query(params) = params.map_err(|e| reject_query(&req_id.0, &e))?;
    let from = parse_point(&req_id.0, "from", params.from_lat, params.from_lon)?;
    let to = parse_point(&req_id.0, "to", params.to_lat, params.to_lon)?;

    let plan = state.locator.plan_route(from, to).await;
    Ok(ApiResponse::new(req_id.0, RouteData::from(plan)))
}
