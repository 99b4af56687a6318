mod info;
mod search;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shuffood")]
#[command(about = "Find nearby restaurants and let chance pick one")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List restaurants around a location
    Search {
        #[command(flatten)]
        query: QueryArgs,
        /// Settle on this candidate id instead of listing
        #[arg(long)]
        pick: Option<String>,
    },
    /// Search, then spin through the results and settle on one
    Shuffle {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show a readable label for a location
    Where {
        #[command(flatten)]
        origin: OriginArgs,
    },
    /// List the cuisine categories that can be excluded
    Cuisines,
}

/// Search origin. Without both values the configured fallback is used.
#[derive(Debug, Args)]
struct OriginArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[command(flatten)]
    origin: OriginArgs,
    /// Search radius in miles (defaults to SHUFFOOD_DEFAULT_RADIUS_MILES)
    #[arg(long)]
    radius: Option<f64>,
    /// Minimum rating, 0 to 5; 0 keeps unrated places
    #[arg(long, default_value = "0")]
    min_rating: f64,
    /// Cuisine to leave out (repeatable), e.g. --exclude thai
    #[arg(long = "exclude", value_name = "CUISINE")]
    exclude: Vec<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shuffood_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search { query, pick }) => {
            search::run_search(&config, &query, pick.as_deref()).await?;
        }
        Some(Commands::Shuffle { query }) => search::run_shuffle(&config, &query).await?,
        Some(Commands::Where { origin }) => info::run_where(&config, &origin).await?,
        Some(Commands::Cuisines) => info::run_cuisines(&config)?,
        None => println!("nothing to do; try `shuffood shuffle --help`"),
    }

    Ok(())
}
