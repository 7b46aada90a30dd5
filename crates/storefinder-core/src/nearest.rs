//! Nearest-store scan.

use crate::geo::{haversine_distance_m, LatLng};
use crate::stores::Store;

/// The closest store to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub store: &'a Store,
    /// Great-circle distance from the query point in metres.
    pub distance_m: f64,
}

/// Linear scan for the store closest to `target`.
///
/// Stores without valid coordinates are skipped. On equal distances the
/// earliest store in `stores` wins. Returns `None` when `target` is invalid
/// or no store has a position.
#[must_use]
pub fn nearest_store(target: LatLng, stores: &[Store]) -> Option<Nearest<'_>> {
    if !target.is_valid() {
        return None;
    }

    let mut best: Option<Nearest<'_>> = None;
    for store in stores {
        let Some(position) = store.position() else {
            continue;
        };
        let distance_m = haversine_distance_m(target, position);
        if best.is_none_or(|b| distance_m < b.distance_m) {
            best = Some(Nearest { store, distance_m });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str, lat: Option<f64>, lon: Option<f64>) -> Store {
        Store {
            name: name.to_string(),
            address: format!("{name} address"),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn picks_the_closest_store() {
        let stores = vec![
            store("Far", Some(-22.90), Some(-43.17)),
            store("Near", Some(-23.55), Some(-46.63)),
            store("Middle", Some(-23.00), Some(-46.00)),
        ];
        let nearest = nearest_store(LatLng::new(-23.56, -46.64), &stores).unwrap();
        assert_eq!(nearest.store.name, "Near");
        assert!(nearest.distance_m < 2_000.0, "got {}", nearest.distance_m);
    }

    #[test]
    fn ties_resolve_to_the_earliest_store() {
        // Mirror images across the query meridian are exactly equidistant.
        let stores = vec![
            store("First", Some(0.0), Some(-0.5)),
            store("Second", Some(0.0), Some(0.5)),
        ];
        let nearest = nearest_store(LatLng::new(0.0, 0.0), &stores).unwrap();
        assert_eq!(nearest.store.name, "First");

        let reversed: Vec<Store> = stores.into_iter().rev().collect();
        let nearest = nearest_store(LatLng::new(0.0, 0.0), &reversed).unwrap();
        assert_eq!(nearest.store.name, "Second");
    }

    #[test]
    fn stores_without_coordinates_are_skipped() {
        let stores = vec![
            store("Missing", None, None),
            store("HalfMissing", Some(-23.55), None),
            store("Invalid", Some(200.0), Some(-46.63)),
            store("Valid", Some(-10.0), Some(-40.0)),
        ];
        let nearest = nearest_store(LatLng::new(-23.55, -46.63), &stores).unwrap();
        assert_eq!(nearest.store.name, "Valid");
    }

    #[test]
    fn no_located_store_returns_none() {
        let stores = vec![store("Missing", None, None)];
        assert!(nearest_store(LatLng::new(-23.55, -46.63), &stores).is_none());
        assert!(nearest_store(LatLng::new(-23.55, -46.63), &[]).is_none());
    }

    #[test]
    fn invalid_target_returns_none() {
        let stores = vec![store("Valid", Some(-23.55), Some(-46.63))];
        assert!(nearest_store(LatLng::new(f64::NAN, -46.63), &stores).is_none());
    }

    #[test]
    fn result_minimises_distance_over_all_stores() {
        let stores: Vec<Store> = (0..25)
            .map(|i| {
                let offset = f64::from(i) * 0.037;
                store(
                    &format!("S{i}"),
                    Some(-24.0 + offset),
                    Some(-47.0 + offset * 1.3),
                )
            })
            .collect();
        let target = LatLng::new(-23.61, -46.52);
        let nearest = nearest_store(target, &stores).unwrap();
        for s in &stores {
            let d = haversine_distance_m(target, s.position().unwrap());
            assert!(nearest.distance_m <= d);
        }
    }
}
