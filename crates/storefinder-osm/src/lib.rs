//! HTTP clients for the OpenStreetMap services behind the store locator:
//! Nominatim for geocoding and OSRM for driving routes.

pub mod error;
mod http;
pub mod nominatim;
pub mod osrm;
mod retry;
pub mod types;

pub use error::OsmError;
pub use http::ClientSettings;
pub use nominatim::{NominatimClient, SearchQuery};
pub use osrm::OsrmClient;
pub use types::{Place, PlaceAddress, Route};
