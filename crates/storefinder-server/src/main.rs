mod api;
mod middleware;

use std::sync::Arc;

use storefinder_locator::{Locator, LocatorSettings};
use storefinder_osm::{ClientSettings, NominatimClient, OsrmClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stores = storefinder_core::load_stores(&config.stores_path)?;
    let located = stores.iter().filter(|s| s.position().is_some()).count();

    let settings = ClientSettings::from_app_config(&config);
    let geocoder = NominatimClient::new(&settings, &config.nominatim_url, &config.country_codes)?;
    let router = OsrmClient::new(&settings, &config.osrm_url)?;
    let locator = Locator::new(
        geocoder,
        router,
        stores,
        LocatorSettings::from_app_config(&config),
    );

    let app = build_app(
        AppState {
            locator: Arc::new(locator),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        stores = located,
        "storefinder server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
