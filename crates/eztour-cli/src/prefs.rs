//! `prefs` subcommand handlers.

use eztour_core::DistanceUnit;
use sqlx::SqlitePool;

/// Print the stored search criteria and distance unit.
///
/// # Errors
///
/// Returns an error if the preferences cannot be read.
pub(crate) async fn run_prefs_show(pool: &SqlitePool) -> anyhow::Result<()> {
    let criteria = eztour_db::load_search_preferences(pool).await?;
    let unit = eztour_db::load_distance_unit(pool).await?;

    let category = criteria
        .category
        .map_or_else(|| "(not set)".to_string(), |c| c.to_string());
    let price_tier = criteria.price_tier.map_or_else(
        || "(not set)".to_string(),
        |t| format!("{} ({})", t.value(), t.label()),
    );

    println!("{:<15}{category}", "category");
    println!("{:<15}{price_tier}", "price tier");
    println!("{:<15}{unit}", "distance unit");
    Ok(())
}

/// Store `unit` as the distance unit for future searches.
///
/// # Errors
///
/// Returns an error if the preference cannot be written.
pub(crate) async fn run_prefs_units(pool: &SqlitePool, unit: DistanceUnit) -> anyhow::Result<()> {
    eztour_db::save_distance_unit(pool, unit).await?;
    println!("distance unit set to {unit}");
    Ok(())
}
