mod app;
mod history;
mod output;
mod search;

use clap::{Args, Parser, Subcommand};
use placefind_core::Coordinate;
use tracing_subscriber::EnvFilter;

use crate::history::HistoryCommands;

#[derive(Debug, Parser)]
#[command(name = "placefind")]
#[command(about = "Find places and driving routes near a position")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for a category or an address near a position
    Search {
        /// Free text, e.g. "restaurants" or "221B Baker Street"
        text: String,
        #[command(flatten)]
        origin: OriginArgs,
        /// Also resolve a driving route to the first result
        #[arg(long)]
        route: bool,
    },
    /// Search one category directly, e.g. `food` or `health`
    Quick {
        category: String,
        #[command(flatten)]
        origin: OriginArgs,
    },
    /// Read successive input states from stdin, one per line, as live typing
    Live {
        #[command(flatten)]
        origin: OriginArgs,
        /// Print the driving route to each newly selected place
        #[arg(long)]
        route: bool,
    },
    /// Resolve a driving route between two positions
    Route {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,
    },
    /// Inspect or edit the search history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// List the POI categories and their filters
    Categories,
}

#[derive(Debug, Clone, Copy, Args)]
struct OriginArgs {
    /// Latitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

impl OriginArgs {
    fn coordinate(self) -> anyhow::Result<Coordinate> {
        app::checked_coordinate(self.lat, self.lon)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = placefind_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search {
            text,
            origin,
            route,
        } => search::run_search(&config, &text, origin.coordinate()?, route).await,
        Commands::Quick { category, origin } => {
            search::run_quick(&config, &category, origin.coordinate()?).await
        }
        Commands::Live { origin, route } => {
            search::run_live(&config, origin.coordinate()?, route).await
        }
        Commands::Route {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        } => {
            let from = app::checked_coordinate(from_lat, from_lon)?;
            let to = app::checked_coordinate(to_lat, to_lon)?;
            search::run_route(&config, from, to).await
        }
        Commands::History { command } => history::run_history(&config, command).await,
        Commands::Categories => {
            let taxonomy = placefind_core::resolve_taxonomy(&config)?;
            output::print_categories(&taxonomy);
            Ok(())
        }
    }
}
