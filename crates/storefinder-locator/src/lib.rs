//! Store-locator pipeline: geocode an address, pick the nearest store, plan
//! a driving route, and offer debounced address suggestions while typing.
//!
//! [`Locator`] holds the lookups and is shared by every front end.
//! [`Controller`] drives a [`MapView`] the way a map page would.

pub mod controller;
pub mod debounce;
pub mod error;
pub mod label;
pub mod lookup;
pub mod pipeline;
pub mod session;
pub mod view;

#[cfg(test)]
mod testing;

pub use controller::{Controller, ControllerSettings};
pub use debounce::Debouncer;
pub use error::{LocateError, PositionError};
pub use label::{format_label, suggestions_from_places, Suggestion};
pub use lookup::{Geocoder, PositionSource, RouteService};
pub use pipeline::{Locator, LocatorSettings, RoutePlan, SearchResult};
pub use session::{RequestSeq, Session};
pub use view::{Card, MapView, OverlayId};
