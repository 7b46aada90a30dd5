//! What the controller needs from a map front end.

use storefinder_core::{Bounds, LatLng, Store};

use crate::label::Suggestion;
use crate::pipeline::SearchResult;

pub const MSG_EMPTY_INPUT: &str = "Please enter an address.";
pub const MSG_SEARCHING: &str = "Searching…";
pub const MSG_NOT_FOUND: &str = "Address not found.";
pub const MSG_FAILED: &str = "Search failed.";
pub const MSG_NO_STORES: &str = "No stores available.";

/// Handle to something drawn on the map, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Content of the result card.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// Transient validation message.
    Notice(&'static str),
    Busy,
    NotFound,
    Failed,
    NoStores,
    Result(SearchResult),
}

impl Card {
    /// Fixed user-facing text for every card except [`Card::Result`].
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Notice(text) => Some(*text),
            Self::Busy => Some(MSG_SEARCHING),
            Self::NotFound => Some(MSG_NOT_FOUND),
            Self::Failed => Some(MSG_FAILED),
            Self::NoStores => Some(MSG_NO_STORES),
            Self::Result(_) => None,
        }
    }
}

/// Map page operations. Implementations render; they never block on I/O.
pub trait MapView: Send {
    fn add_store_marker(&mut self, store: &Store, position: LatLng);

    fn show_card(&mut self, card: Card);

    fn hide_card(&mut self);

    /// Marks the geocoded address.
    fn place_search_marker(&mut self, point: LatLng) -> OverlayId;

    fn draw_route(&mut self, path: &[LatLng]) -> OverlayId;

    fn remove_overlay(&mut self, id: OverlayId);

    fn fit_bounds(&mut self, bounds: Bounds);

    fn show_suggestions(&mut self, suggestions: &[Suggestion]);

    fn hide_suggestions(&mut self);

    /// Replaces the address input text.
    fn set_input(&mut self, text: &str);
}
