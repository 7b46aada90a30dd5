mod commands;
mod interactive;
mod terminal;

use clap::{Parser, Subcommand};
use storefinder_core::LatLng;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder")]
#[command(about = "Find the store nearest to an address")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the configured stores
    Stores,
    /// Nearest store to a coordinate, without geocoding
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Geocode an address, pick the nearest store and plan the route to it
    Search {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
        /// Prefer matches around this point
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        near: Option<LatLng>,
    },
    /// Address suggestions for partial input
    Suggest {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        near: Option<LatLng>,
    },
    /// Driving route between two points
    Route {
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        from: LatLng,
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        to: LatLng,
    },
    /// Type an address line by line, with live suggestions
    Interactive {
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        near: Option<LatLng>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = storefinder_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let stores = storefinder_core::load_stores(&config.stores_path)?;

    match cli.command {
        Commands::Stores => commands::run_stores(&stores),
        Commands::Nearest { lat, lon } => commands::run_nearest(&stores, LatLng::new(lat, lon))?,
        Commands::Search { address, near } => {
            let locator = commands::build_locator(&config, stores)?;
            commands::run_search(&locator, &address.join(" "), near).await?;
        }
        Commands::Suggest { text, near } => {
            let locator = commands::build_locator(&config, stores)?;
            commands::run_suggest(&locator, &text.join(" "), near).await?;
        }
        Commands::Route { from, to } => {
            let locator = commands::build_locator(&config, stores)?;
            commands::run_route(&locator, from, to).await;
        }
        Commands::Interactive { near } => {
            let locator = commands::build_locator(&config, stores)?;
            interactive::run(locator, &config, near).await?;
        }
    }

    Ok(())
}
