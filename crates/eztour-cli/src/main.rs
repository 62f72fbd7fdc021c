mod db;
mod details;
mod favorites;
mod prefs;
mod search;

use clap::{Parser, Subcommand};
use eztour_core::{DistanceUnit, PlaceCategory, Position};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eztour")]
#[command(about = "Find nearby places by category and price tier")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around a position, widening the radius for extra pages
    Search {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Place category (defaults to the last one used)
        #[arg(long)]
        category: Option<PlaceCategory>,
        /// Price tier 0-4 (defaults to the last one used)
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=4))]
        price_tier: Option<i64>,
        /// Number of load-more rounds after the initial search
        #[arg(long, default_value_t = 0)]
        pages: u32,
        /// Save the result with this place id as a favorite
        #[arg(long)]
        save: Option<String>,
        /// Show distances in miles for this run
        #[arg(long)]
        miles: bool,
        /// Print a photo URL under each result that has one (URLs carry the API key)
        #[arg(long)]
        photo_urls: bool,
    },
    /// Show the provider's detail record for one place
    Details {
        /// Place id, as printed by `search`
        place_id: String,
        /// Number of reviews to print
        #[arg(long, default_value_t = 3)]
        reviews: usize,
    },
    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Show or change stored preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesCommands {
    /// List saved favorites
    List,
    /// Remove a favorite by place id
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
enum PrefsCommands {
    /// Print the stored search criteria and distance unit
    Show,
    /// Set the distance unit (metric or imperial)
    Units { unit: DistanceUnit },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = eztour_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; run `eztour --help` for usage");
        return Ok(());
    };

    let pool_config = eztour_db::PoolConfig::from_app_config(&config);
    let pool = eztour_db::connect_pool(&config.database_url, pool_config).await?;

    // `db` commands manage migrations themselves; everything else needs the
    // schema in place.
    if !matches!(command, Commands::Db { .. }) {
        eztour_db::run_migrations(&pool).await?;
    }

    match command {
        Commands::Search {
            lat,
            lng,
            category,
            price_tier,
            pages,
            save,
            miles,
            photo_urls,
        } => {
            let options = search::SearchOptions {
                position: Position::new(lat, lng),
                category,
                price_tier,
                pages,
                save,
                miles,
                photo_urls,
            };
            search::run_search(&pool, &config, options).await?;
        }
        Commands::Details { place_id, reviews } => {
            details::run_details(&config, &place_id, reviews).await?;
        }
        Commands::Favorites { command } => match command {
            FavoritesCommands::List => favorites::run_favorites_list(&pool).await?,
            FavoritesCommands::Remove { id } => favorites::run_favorites_remove(&pool, &id).await?,
        },
        Commands::Prefs { command } => match command {
            PrefsCommands::Show => prefs::run_prefs_show(&pool).await?,
            PrefsCommands::Units { unit } => prefs::run_prefs_units(&pool, unit).await?,
        },
        Commands::Db { command } => match command {
            DbCommands::Migrate => db::run_migrate(&pool).await?,
            DbCommands::Ping => db::run_ping(&pool).await?,
        },
    }

    pool.close().await;
    Ok(())
}
