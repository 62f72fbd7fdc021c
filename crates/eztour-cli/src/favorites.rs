//! `favorites` subcommand handlers.

use eztour_db::SqliteFavorites;
use eztour_session::FavoritesStore;
use sqlx::SqlitePool;

use crate::search::truncate;

/// Print every saved favorite.
///
/// # Errors
///
/// Returns an error if the favorites cannot be read.
pub(crate) async fn run_favorites_list(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut store = FavoritesStore::new(SqliteFavorites::new(pool.clone()));
    if !store.reload().await {
        anyhow::bail!("could not read favorites; see the log for details");
    }

    if store.is_empty() {
        println!("no favorites saved; use `search --save <place_id>` to add one");
        return Ok(());
    }

    println!(
        "{:<32}{:<36}{:<16}{:<8}",
        "ID", "NAME", "PRICE", "RATING"
    );
    for favorite in store.favorites() {
        let price = favorite.price_tier.map_or("", |t| t.label());
        let rating = favorite
            .rating
            .map_or_else(String::new, |r| format!("{r:.1}"));
        println!(
            "{:<32}{:<36}{:<16}{:<8}",
            truncate(&favorite.id, 30),
            truncate(&favorite.name, 34),
            price,
            rating
        );
    }
    Ok(())
}

/// Remove the favorite with `id`.
///
/// # Errors
///
/// Returns an error if the favorite exists but could not be deleted.
pub(crate) async fn run_favorites_remove(pool: &SqlitePool, id: &str) -> anyhow::Result<()> {
    let mut store = FavoritesStore::load(SqliteFavorites::new(pool.clone())).await;
    if !store.is_favorite(id) {
        println!("no favorite with id '{id}'");
        return Ok(());
    }
    if !store.remove(id).await || store.is_favorite(id) {
        anyhow::bail!("failed to remove favorite '{id}'; see the log for details");
    }
    println!("removed favorite '{id}'");
    Ok(())
}
