use axum::{extract::State, response::IntoResponse, Extension};
use serde::Serialize;
use storefinder_core::Store;

use super::{ApiResponse, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Whether the store has usable coordinates and appears on the map.
    pub located: bool,
}

impl From<&Store> for StoreItem {
    fn from(store: &Store) -> Self {
        Self {
            name: store.name.clone(),
            address: store.address.clone(),
            latitude: store.latitude,
            longitude: store.longitude,
            located: store.position().is_some(),
        }
    }
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let items: Vec<StoreItem> = state.locator.stores().iter().map(StoreItem::from).collect();
    ApiResponse::new(req_id.0, items)
}
