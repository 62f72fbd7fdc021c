//! Database operations for the `favorite_places` table.

use std::future::Future;

use chrono::{DateTime, Utc};
use eztour_core::{FavoriteEntity, Photo};
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `favorite_places` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price_tier: i64,
    pub rating: f64,
    pub is_open_now: bool,
    pub photo_reference: Option<String>,
    pub photo_height: i64,
    pub photo_width: i64,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for FavoriteEntity {
    fn from(row: FavoriteRow) -> Self {
        let photo = row.photo_reference.map(|reference| Photo {
            reference,
            height: u32::try_from(row.photo_height).unwrap_or(0),
            width: u32::try_from(row.photo_width).unwrap_or(0),
        });
        Self {
            id: row.id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            price_tier: u8::try_from(row.price_tier).unwrap_or(0),
            rating: row.rating,
            is_open_now: row.is_open_now,
            photo,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, latitude, longitude, price_tier, rating, is_open_now, \
                                     photo_reference, photo_height, photo_width, created_at \
                              FROM favorite_places";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a favorite. Returns `false` when a favorite with the same id
/// already exists; the stored row is left untouched in that case.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn insert_favorite(pool: &SqlitePool, favorite: &FavoriteEntity) -> Result<bool, DbError> {
    let (photo_reference, photo_height, photo_width) = match &favorite.photo {
        Some(photo) => (
            Some(photo.reference.as_str()),
            i64::from(photo.height),
            i64::from(photo.width),
        ),
        None => (None, 0, 0),
    };

    let result = sqlx::query(
        "INSERT INTO favorite_places \
             (id, name, latitude, longitude, price_tier, rating, is_open_now, \
              photo_reference, photo_height, photo_width, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&favorite.id)
    .bind(&favorite.name)
    .bind(favorite.latitude)
    .bind(favorite.longitude)
    .bind(i64::from(favorite.price_tier))
    .bind(favorite.rating)
    .bind(favorite.is_open_now)
    .bind(photo_reference)
    .bind(photo_height)
    .bind(photo_width)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes the favorite with `id`. Returns `false` if no such row existed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_favorite(pool: &SqlitePool, id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM favorite_places WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns every favorite, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_favorites(pool: &SqlitePool) -> Result<Vec<FavoriteRow>, DbError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY created_at, id");
    let rows = sqlx::query_as::<_, FavoriteRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns a single favorite by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_favorite(pool: &SqlitePool, id: &str) -> Result<Option<FavoriteRow>, DbError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    let row = sqlx::query_as::<_, FavoriteRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

// ---------------------------------------------------------------------------
// Repository seam
// ---------------------------------------------------------------------------

/// Durable storage behind the favorites store.
pub trait FavoriteRepository {
    fn insert(&self, favorite: &FavoriteEntity) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Deleting an id that is not stored is not an error.
    fn delete_by_id(&self, id: &str) -> impl Future<Output = Result<(), DbError>> + Send;

    fn fetch_all(&self) -> impl Future<Output = Result<Vec<FavoriteEntity>, DbError>> + Send;
}

/// [`FavoriteRepository`] over a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteFavorites {
    pool: SqlitePool,
}

impl SqliteFavorites {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FavoriteRepository for SqliteFavorites {
    async fn insert(&self, favorite: &FavoriteEntity) -> Result<(), DbError> {
        if !insert_favorite(&self.pool, favorite).await? {
            tracing::debug!(id = %favorite.id, "favorite already stored");
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
        if !delete_favorite(&self.pool, id).await? {
            tracing::debug!(id, "no favorite to delete");
        }
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<FavoriteEntity>, DbError> {
        let rows = list_favorites(&self.pool).await?;
        Ok(rows.into_iter().map(FavoriteEntity::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(photo_reference: Option<&str>) -> FavoriteRow {
        FavoriteRow {
            id: "place-1".to_string(),
            name: "Corner Cafe".to_string(),
            latitude: 1.5,
            longitude: -2.5,
            price_tier: 2,
            rating: 4.5,
            is_open_now: true,
            photo_reference: photo_reference.map(str::to_string),
            photo_height: 480,
            photo_width: 640,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_with_photo_converts() {
        let entity = FavoriteEntity::from(row(Some("ref-1")));
        assert_eq!(entity.id, "place-1");
        assert_eq!(entity.price_tier, 2);
        let photo = entity.photo.expect("photo retained");
        assert_eq!(photo.reference, "ref-1");
        assert_eq!((photo.height, photo.width), (480, 640));
    }

    #[test]
    fn row_without_reference_has_no_photo() {
        let entity = FavoriteEntity::from(row(None));
        assert!(entity.photo.is_none());
    }

    #[test]
    fn negative_dimensions_clamp_to_zero() {
        let mut r = row(Some("ref"));
        r.photo_height = -1;
        let entity = FavoriteEntity::from(r);
        assert_eq!(entity.photo.map(|p| p.height), Some(0));
    }
}
