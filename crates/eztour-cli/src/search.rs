//! `search` subcommand: drives the location controller, the search session
//! and the favorites store end to end.

use anyhow::Context;
use eztour_core::{
    AppConfig, Candidate, DistanceUnit, PlaceCategory, Position, PriceTier, SearchCriteria,
};
use eztour_db::SqliteFavorites;
use eztour_places::{GeoSearchEngine, PlacesClient};
use eztour_session::{
    AuthorizationStatus, FavoritesStore, LocationAuthorizationController, LocationPlatform,
    SearchDriver,
};
use sqlx::SqlitePool;

#[derive(Debug)]
pub(crate) struct SearchOptions {
    pub(crate) position: Position,
    pub(crate) category: Option<PlaceCategory>,
    pub(crate) price_tier: Option<i64>,
    pub(crate) pages: u32,
    pub(crate) save: Option<String>,
    pub(crate) miles: bool,
    pub(crate) photo_urls: bool,
}

/// A platform whose user has already granted permission and whose position
/// comes from the command line.
struct CommandLinePlatform;

impl LocationPlatform for CommandLinePlatform {
    fn request_authorization(&self) {
        tracing::debug!("authorization requested; granted by command line");
    }

    fn start_updating_location(&self) {
        tracing::debug!("using command-line position");
    }
}

/// Run a search, optional load-more rounds, print the ranked results and
/// optionally save one of them.
///
/// Category and price tier fall back to the last ones used; the chosen pair
/// is stored for next time.
///
/// # Errors
///
/// Returns an error if the API key is missing, no criteria are available, the
/// initial search fails, or the place to save is not among the results.
pub(crate) async fn run_search(
    pool: &SqlitePool,
    config: &AppConfig,
    options: SearchOptions,
) -> anyhow::Result<()> {
    let client =
        PlacesClient::from_app_config(config).context("cannot create the places client")?;

    let saved = eztour_db::load_search_preferences(pool).await?;
    let category = options
        .category
        .or(saved.category)
        .context("no category given and none saved; pass --category")?;
    let price_tier = match options.price_tier {
        Some(value) => PriceTier::new(value)?,
        None => saved
            .price_tier
            .context("no price tier given and none saved; pass --price-tier")?,
    };
    eztour_db::save_search_preferences(pool, &SearchCriteria::new(category, price_tier)).await?;

    let unit = if options.miles {
        DistanceUnit::Imperial
    } else {
        eztour_db::load_distance_unit(pool).await?
    };

    let mut controller = LocationAuthorizationController::new(CommandLinePlatform);
    controller.handle_authorization_change(AuthorizationStatus::NotDetermined)?;
    controller.handle_authorization_change(AuthorizationStatus::AuthorizedWhenInUse)?;
    controller.handle_location_update(&[options.position]);

    let mut driver = SearchDriver::new(GeoSearchEngine::new(client), controller.subscribe());
    driver
        .wait_for_position()
        .await
        .context("location controller stopped before publishing a position")?;
    driver.select_criteria(category, price_tier);

    let added = driver.search().await?;
    tracing::info!(added, radius = %driver.session().radius(), "initial search complete");

    for page in 1..=options.pages {
        if driver.session().radius().is_at_ceiling() {
            println!("search radius is at its maximum; no more pages");
            break;
        }
        match driver.load_more().await {
            Ok(added) => {
                tracing::info!(page, added, radius = %driver.session().radius(), "page loaded");
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "load more failed; keeping current results");
                break;
            }
        }
    }

    let photos = options
        .photo_urls
        .then(|| (driver.engine().client(), config.places_photo_max_width));
    print_results(&driver.session().ranked(), unit, category, price_tier, photos);

    let session = driver.into_session();

    if let Some(id) = options.save {
        let candidate = session
            .find(&id)
            .with_context(|| format!("place '{id}' is not among the results"))?;
        let mut store = FavoritesStore::load(SqliteFavorites::new(pool.clone())).await;
        if !store.add(candidate).await {
            anyhow::bail!("failed to save '{id}' as a favorite; see the log for details");
        }
        println!("saved '{}' to favorites", candidate.name);
    }

    Ok(())
}

fn print_results(
    ranked: &[Candidate],
    unit: DistanceUnit,
    category: PlaceCategory,
    price_tier: PriceTier,
    photos: Option<(&PlacesClient, u32)>,
) {
    if ranked.is_empty() {
        println!(
            "no {category} places at tier {} ({}) nearby",
            price_tier.value(),
            price_tier.label()
        );
        return;
    }

    println!(
        "{:<4}{:<36}{:<8}{:<8}{:<16}ID",
        "#", "NAME", "RATING", "OPEN", "DISTANCE"
    );
    for (index, candidate) in ranked.iter().enumerate() {
        let rating = candidate
            .rating
            .map_or_else(String::new, |r| format!("{r:.1}"));
        let open = match candidate.is_open_now {
            Some(true) => "yes",
            Some(false) => "no",
            None => "",
        };
        let distance = candidate.distance_label(unit).unwrap_or_default();
        println!(
            "{:<4}{:<36}{:<8}{:<8}{:<16}{}",
            index + 1,
            truncate(&candidate.name, 34),
            rating,
            open,
            distance,
            candidate.id
        );
        if let (Some((client, max_width)), Some(photo)) = (photos, candidate.photos.first()) {
            match client.photo_url(&photo.reference, max_width) {
                Ok(url) => println!("    {url}"),
                Err(e) => tracing::warn!(id = %candidate.id, error = %e, "could not build photo URL"),
            }
        }
    }
}

/// Shortens `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max.saturating_sub(3)).collect::<String>())
    } else {
        text.to_string()
    }
}
