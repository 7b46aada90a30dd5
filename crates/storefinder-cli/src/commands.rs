//! One-shot subcommands.

use storefinder_core::{nearest_store, AppConfig, LatLng, Store};
use storefinder_locator::view::{MSG_EMPTY_INPUT, MSG_FAILED, MSG_NOT_FOUND, MSG_NO_STORES};
use storefinder_locator::{LocateError, Locator, LocatorSettings, RoutePlan, SearchResult};
use storefinder_osm::{ClientSettings, NominatimClient, OsrmClient};

pub(crate) type OsmLocator = Locator<NominatimClient, OsrmClient>;

/// Wires the OSM clients and the store list into a [`Locator`].
///
/// # Errors
///
/// Returns an error if either HTTP client cannot be built.
pub(crate) fn build_locator(config: &AppConfig, stores: Vec<Store>) -> anyhow::Result<OsmLocator> {
    let settings = ClientSettings::from_app_config(config);
    let geocoder = NominatimClient::new(&settings, &config.nominatim_url, &config.country_codes)?;
    let router = OsrmClient::new(&settings, &config.osrm_url)?;
    Ok(Locator::new(
        geocoder,
        router,
        stores,
        LocatorSettings::from_app_config(config),
    ))
}

pub(crate) fn run_stores(stores: &[Store]) {
    if stores.is_empty() {
        println!("no stores configured");
        return;
    }
    println!("{:<28}{:<24}ADDRESS", "NAME", "POSITION");
    for store in stores {
        let position = store
            .position()
            .map_or_else(|| "-".to_owned(), |p| format!("{:.5},{:.5}", p.lat, p.lon));
        println!("{:<28}{:<24}{}", store.name, position, store.address);
    }
}

/// # Errors
///
/// Returns an error if `point` is out of range or no store has coordinates.
pub(crate) fn run_nearest(stores: &[Store], point: LatLng) -> anyhow::Result<()> {
    if !point.is_valid() {
        anyhow::bail!("coordinate out of range: {point}");
    }
    let nearest = nearest_store(point, stores).ok_or_else(|| anyhow::anyhow!(MSG_NO_STORES))?;
    println!(
        "{} ({:.1} km)\n{}",
        nearest.store.name,
        nearest.distance_m / 1000.0,
        nearest.store.address
    );
    Ok(())
}

/// # Errors
///
/// Returns an error carrying the user-facing message when the search ends
/// without a store.
pub(crate) async fn run_search(
    locator: &OsmLocator,
    address: &str,
    near: Option<LatLng>,
) -> anyhow::Result<()> {
    let result = locator
        .find_nearest(address, near)
        .await
        .map_err(|e| {
            let message = user_message(&e);
            anyhow::Error::new(e).context(message)
        })?;
    print_result(&result);

    if let Some(destination) = result.store.position() {
        print_plan(&locator.plan_route(result.point, destination).await);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the geocoding request fails.
pub(crate) async fn run_suggest(
    locator: &OsmLocator,
    text: &str,
    near: Option<LatLng>,
) -> anyhow::Result<()> {
    let suggestions = locator.suggest(text, near).await?;
    if suggestions.is_empty() {
        println!("no suggestions");
    }
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{:>2}. {}", i + 1, suggestion.label);
    }
    Ok(())
}

pub(crate) async fn run_route(locator: &OsmLocator, from: LatLng, to: LatLng) {
    print_plan(&locator.plan_route(from, to).await);
}

pub(crate) fn user_message(err: &LocateError) -> &'static str {
    match err {
        LocateError::EmptyInput => MSG_EMPTY_INPUT,
        LocateError::NotFound => MSG_NOT_FOUND,
        LocateError::NoStores => MSG_NO_STORES,
        LocateError::Lookup(_) => MSG_FAILED,
    }
}

pub(crate) fn format_result(result: &SearchResult) -> String {
    let mut out = format!(
        "Nearest store: {}\n{}\n{} away",
        result.store.name,
        result.store.address,
        result.distance_km_label()
    );
    if let Some(url) = result.directions_url() {
        out.push_str("\nDirections: ");
        out.push_str(&url);
    }
    out
}

pub(crate) fn format_plan(plan: &RoutePlan) -> String {
    match plan {
        RoutePlan::Full(route) => format!(
            "Route: {:.1} km, about {} min ({} points)",
            route.distance_m / 1000.0,
            (route.duration_s / 60.0).round(),
            route.path.len()
        ),
        RoutePlan::Degraded { bounds } => format!(
            "Route unavailable; area {:.4},{:.4} to {:.4},{:.4}",
            bounds.south, bounds.west, bounds.north, bounds.east
        ),
    }
}

fn print_result(result: &SearchResult) {
    println!("{}", format_result(result));
}

fn print_plan(plan: &RoutePlan) {
    println!("{}", format_plan(plan));
}
