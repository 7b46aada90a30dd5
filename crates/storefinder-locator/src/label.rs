//! Short human-readable labels for geocoder candidates.

use std::collections::HashSet;

use serde::Serialize;
use storefinder_core::LatLng;
use storefinder_osm::Place;

/// One entry of the autocomplete dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub point: LatLng,
}

/// Formats a candidate as `street[, number], neighbourhood, city, state`,
/// leaving out the parts the geocoder did not return.
///
/// The street falls back from `road` to `pedestrian`, `street` and finally
/// the place name. When no part at all is present the geocoder's
/// `display_name` is used, minus its trailing country.
#[must_use]
pub fn format_label(place: &Place) -> String {
    let address = &place.address;
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if let Some(street) = first_present(&[
        address.road.as_deref(),
        address.pedestrian.as_deref(),
        address.street.as_deref(),
        place.name.as_deref(),
    ]) {
        match first_present(&[address.house_number.as_deref()]) {
            Some(number) => parts.push(format!("{street}, {number}")),
            None => parts.push(street.to_owned()),
        }
    }

    let rest = [
        first_present(&[address.suburb.as_deref(), address.neighbourhood.as_deref()]),
        first_present(&[
            address.city.as_deref(),
            address.town.as_deref(),
            address.municipality.as_deref(),
        ]),
        first_present(&[address.state.as_deref()]),
    ];
    parts.extend(rest.into_iter().flatten().map(str::to_owned));

    if parts.is_empty() {
        return strip_country(&place.display_name, address.country.as_deref());
    }
    parts.join(", ")
}

/// Labels `places` in ranking order, dropping blank and repeated labels, and
/// keeps at most `limit` of them.
#[must_use]
pub fn suggestions_from_places(places: &[Place], limit: usize) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    places
        .iter()
        .filter_map(|place| {
            let label = format_label(place);
            if label.is_empty() || !seen.insert(label.clone()) {
                return None;
            }
            Some(Suggestion {
                label,
                point: place.point,
            })
        })
        .take(limit)
        .collect()
}

fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

fn strip_country(display_name: &str, country: Option<&str>) -> String {
    let name = display_name.trim();
    let stripped = country
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| name.strip_suffix(c))
        .and_then(|head| head.trim_end().strip_suffix(','))
        .map(str::trim_end);
    stripped.unwrap_or(name).to_owned()
}
