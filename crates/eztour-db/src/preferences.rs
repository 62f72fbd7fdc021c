//! Key/value user preferences: the last search criteria and the distance
//! unit toggle.
//!
//! Values that no longer parse (for example a category renamed between
//! releases) are logged and treated as unset rather than failing the load.

use chrono::Utc;
use eztour_core::{DistanceUnit, PlaceCategory, PriceTier, SearchCriteria};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::DbError;

const CATEGORY_KEY: &str = "search.category";
const PRICE_TIER_KEY: &str = "search.price_tier";
const DISTANCE_UNIT_KEY: &str = "display.distance_unit";

/// Stores the chosen criteria. Fields that are `None` are cleared.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the update is atomic.
pub async fn save_search_preferences(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let tier = criteria.price_tier.map(|t| t.value().to_string());
    put_or_clear(&mut tx, CATEGORY_KEY, criteria.category.map(|c| c.as_str())).await?;
    put_or_clear(&mut tx, PRICE_TIER_KEY, tier.as_deref()).await?;

    tx.commit().await?;
    Ok(())
}

/// Loads the last saved criteria; missing or unparseable values are `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_search_preferences(pool: &SqlitePool) -> Result<SearchCriteria, DbError> {
    let category = get_value(pool, CATEGORY_KEY)
        .await?
        .and_then(|raw| match raw.parse::<PlaceCategory>() {
            Ok(category) => Some(category),
            Err(e) => {
                tracing::warn!(key = CATEGORY_KEY, error = %e, "ignoring stored preference");
                None
            }
        });

    let price_tier = get_value(pool, PRICE_TIER_KEY)
        .await?
        .and_then(|raw| match raw.parse::<i64>().map(PriceTier::new) {
            Ok(Ok(tier)) => Some(tier),
            _ => {
                tracing::warn!(key = PRICE_TIER_KEY, value = %raw, "ignoring stored preference");
                None
            }
        });

    Ok(SearchCriteria {
        category,
        price_tier,
    })
}

/// Persists the distance unit.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn save_distance_unit(pool: &SqlitePool, unit: DistanceUnit) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(DISTANCE_UNIT_KEY)
    .bind(unit.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Loads the distance unit, defaulting to metric when unset or unreadable.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_distance_unit(pool: &SqlitePool) -> Result<DistanceUnit, DbError> {
    let unit = match get_value(pool, DISTANCE_UNIT_KEY).await? {
        Some(raw) => raw.parse::<DistanceUnit>().unwrap_or_else(|e| {
            tracing::warn!(key = DISTANCE_UNIT_KEY, error = %e, "ignoring stored preference");
            DistanceUnit::default()
        }),
        None => DistanceUnit::default(),
    };
    Ok(unit)
}

async fn get_value(pool: &SqlitePool, key: &str) -> Result<Option<String>, DbError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM preferences WHERE key = ?1")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

async fn put_or_clear(
    tx: &mut Transaction<'_, Sqlite>,
    key: &str,
    value: Option<&str>,
) -> Result<(), DbError> {
    match value {
        Some(value) => {
            sqlx::query(
                "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await?;
        }
        None => {
            sqlx::query("DELETE FROM preferences WHERE key = ?1")
                .bind(key)
                .execute(&mut **tx)
                .await?;
        }
    }
    Ok(())
}
