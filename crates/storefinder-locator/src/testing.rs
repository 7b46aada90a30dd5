//! In-memory fakes for the lookup seams and the map view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use storefinder_core::{Bounds, LatLng, Store};
use storefinder_osm::{OsmError, Place, PlaceAddress, Route, SearchQuery};

use crate::label::Suggestion;
use crate::lookup::{Geocoder, RouteService};
use crate::view::{Card, MapView, OverlayId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap()
}

pub(crate) fn store(name: &str, lat: f64, lon: f64) -> Store {
    Store {
        name: name.to_owned(),
        address: format!("{name} address"),
        latitude: Some(lat),
        longitude: Some(lon),
    }
}

pub(crate) fn unlocated_store(name: &str) -> Store {
    Store {
        name: name.to_owned(),
        address: String::new(),
        latitude: None,
        longitude: None,
    }
}

pub(crate) fn place(lat: f64, lon: f64, road: &str) -> Place {
    Place {
        point: LatLng::new(lat, lon),
        display_name: format!("{road}, São Paulo, Brasil"),
        name: None,
        address: PlaceAddress {
            road: Some(road.to_owned()),
            city: Some("São Paulo".to_owned()),
            country: Some("Brasil".to_owned()),
            ..PlaceAddress::default()
        },
    }
}

pub(crate) fn route(path: &[LatLng]) -> Route {
    Route {
        path: path.to_vec(),
        bounds: Bounds::around(path.iter().copied()).unwrap(),
        distance_m: 1234.0,
        duration_s: 120.0,
    }
}

fn upstream_failure(service: &'static str) -> OsmError {
    OsmError::UnexpectedStatus {
        service,
        status: 503,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedQuery {
    pub text: String,
    pub limit: usize,
    pub viewbox: Option<Bounds>,
    pub address_details: bool,
}

#[derive(Clone)]
enum Reply<T> {
    Ok(T),
    Fail,
}

#[derive(Default)]
struct GeocoderState {
    replies: HashMap<String, (Duration, Reply<Vec<Place>>)>,
    queries: Vec<RecordedQuery>,
}

/// Answers by exact query text; unknown text finds nothing.
#[derive(Clone, Default)]
pub(crate) struct FakeGeocoder {
    state: Arc<Mutex<GeocoderState>>,
}

impl FakeGeocoder {
    pub(crate) fn reply(self, text: &str, places: Vec<Place>) -> Self {
        self.reply_after(text, Duration::ZERO, places)
    }

    pub(crate) fn reply_after(self, text: &str, delay: Duration, places: Vec<Place>) -> Self {
        lock(&self.state)
            .replies
            .insert(text.to_owned(), (delay, Reply::Ok(places)));
        self
    }

    pub(crate) fn fail(self, text: &str) -> Self {
        lock(&self.state)
            .replies
            .insert(text.to_owned(), (Duration::ZERO, Reply::Fail));
        self
    }

    pub(crate) fn queries(&self) -> Vec<RecordedQuery> {
        lock(&self.state).queries.clone()
    }
}

impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<Place>, OsmError> {
        let (delay, reply) = {
            let mut state = lock(&self.state);
            state.queries.push(RecordedQuery {
                text: query.text.to_owned(),
                limit: query.limit,
                viewbox: query.viewbox,
                address_details: query.address_details,
            });
            state
                .replies
                .get(query.text)
                .cloned()
                .unwrap_or((Duration::ZERO, Reply::Ok(Vec::new())))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Ok(places) => Ok(places),
            Reply::Fail => Err(upstream_failure("nominatim")),
        }
    }
}

enum RouterReply {
    Direct,
    Fixed(Vec<Route>),
    Fail,
}

struct RouterState {
    reply: RouterReply,
    calls: Vec<(LatLng, LatLng)>,
}

/// Returns the same kind of answer for every pair of points.
#[derive(Clone)]
pub(crate) struct FakeRouter {
    state: Arc<Mutex<RouterState>>,
}

impl FakeRouter {
    fn with(reply: RouterReply) -> Self {
        Self {
            state: Arc::new(Mutex::new(RouterState {
                reply,
                calls: Vec::new(),
            })),
        }
    }

    /// A straight two-point route from start to end.
    pub(crate) fn direct() -> Self {
        Self::with(RouterReply::Direct)
    }

    pub(crate) fn returning(routes: Vec<Route>) -> Self {
        Self::with(RouterReply::Fixed(routes))
    }

    pub(crate) fn failing() -> Self {
        Self::with(RouterReply::Fail)
    }

    pub(crate) fn calls(&self) -> Vec<(LatLng, LatLng)> {
        lock(&self.state).calls.clone()
    }
}

impl RouteService for FakeRouter {
    async fn route(&self, from: LatLng, to: LatLng) -> Result<Vec<Route>, OsmError> {
        let mut state = lock(&self.state);
        state.calls.push((from, to));
        match &state.reply {
            RouterReply::Direct => Ok(vec![route(&[from, to])]),
            RouterReply::Fixed(routes) => Ok(routes.clone()),
            RouterReply::Fail => Err(upstream_failure("osrm")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    StoreMarker(String),
    Card(Card),
    HideCard,
    SearchMarker(LatLng, OverlayId),
    Route(OverlayId),
    Remove(OverlayId),
    Fit(Bounds),
    Suggestions(Vec<String>),
    HideSuggestions,
    Input(String),
}

#[derive(Default)]
struct ViewState {
    events: Vec<ViewEvent>,
    next_id: u64,
}

/// Records every call; clones share the log.
#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    state: Arc<Mutex<ViewState>>,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        lock(&self.state).events.clone()
    }

    pub(crate) fn clear(&self) {
        lock(&self.state).events.clear();
    }

    fn push(&self, event: ViewEvent) {
        lock(&self.state).events.push(event);
    }

    fn overlay(&self) -> OverlayId {
        let mut state = lock(&self.state);
        state.next_id += 1;
        OverlayId(state.next_id)
    }
}

impl MapView for RecordingView {
    fn add_store_marker(&mut self, store: &Store, _position: LatLng) {
        self.push(ViewEvent::StoreMarker(store.name.clone()));
    }

    fn show_card(&mut self, card: Card) {
        self.push(ViewEvent::Card(card));
    }

    fn hide_card(&mut self) {
        self.push(ViewEvent::HideCard);
    }

    fn place_search_marker(&mut self, point: LatLng) -> OverlayId {
        let id = self.overlay();
        self.push(ViewEvent::SearchMarker(point, id));
        id
    }

    fn draw_route(&mut self, _path: &[LatLng]) -> OverlayId {
        let id = self.overlay();
        self.push(ViewEvent::Route(id));
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.push(ViewEvent::Remove(id));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.push(ViewEvent::Fit(bounds));
    }

    fn show_suggestions(&mut self, suggestions: &[Suggestion]) {
        self.push(ViewEvent::Suggestions(
            suggestions.iter().map(|s| s.label.clone()).collect(),
        ));
    }

    fn hide_suggestions(&mut self) {
        self.push(ViewEvent::HideSuggestions);
    }

    fn set_input(&mut self, text: &str) {
        self.push(ViewEvent::Input(text.to_owned()));
    }
}
