//! Integration tests for eztour-db against a migrated in-memory `SQLite`
//! database. Each test gets its own private database.

use eztour_core::{
    DistanceUnit, FavoriteEntity, Photo, PlaceCategory, PriceTier, SearchCriteria,
};
use eztour_db::{
    connect_in_memory, delete_favorite, get_favorite, health_check, insert_favorite,
    list_favorites, load_distance_unit, load_search_preferences, run_migrations,
    save_distance_unit, save_search_preferences, FavoriteRepository, SqliteFavorites,
};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn migrated_pool() -> SqlitePool {
    let pool = connect_in_memory()
        .await
        .expect("in-memory pool should open");
    run_migrations(&pool).await.expect("migrations should apply");
    pool
}

fn favorite(id: &str, name: &str) -> FavoriteEntity {
    FavoriteEntity {
        id: id.to_string(),
        name: name.to_string(),
        latitude: 40.7128,
        longitude: -74.006,
        price_tier: 2,
        rating: 4.5,
        is_open_now: true,
        photo: Some(Photo {
            reference: format!("photo-{id}"),
            height: 480,
            width: 640,
        }),
    }
}

// ---------------------------------------------------------------------------
// Migrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn migrations_apply_once() {
    let pool = connect_in_memory().await.unwrap();

    let first = run_migrations(&pool).await.unwrap();
    let second = run_migrations(&pool).await.unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    health_check(&pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insert_then_list_round_trips_fields() {
    let pool = migrated_pool().await;
    let original = favorite("p1", "Corner Cafe");

    assert!(insert_favorite(&pool, &original).await.unwrap());

    let rows = list_favorites(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    let restored = FavoriteEntity::from(rows[0].clone());
    assert_eq!(restored, original);
}

#[tokio::test]
async fn favorite_without_photo_round_trips() {
    let pool = migrated_pool().await;
    let mut original = favorite("p1", "Bare");
    original.photo = None;

    insert_favorite(&pool, &original).await.unwrap();
    let row = get_favorite(&pool, "p1").await.unwrap().expect("row exists");

    assert!(row.photo_reference.is_none());
    assert_eq!(FavoriteEntity::from(row), original);
}

#[tokio::test]
async fn duplicate_id_is_ignored() {
    let pool = migrated_pool().await;

    assert!(insert_favorite(&pool, &favorite("p1", "First")).await.unwrap());
    assert!(!insert_favorite(&pool, &favorite("p1", "Second")).await.unwrap());

    let rows = list_favorites(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "First");
}

#[tokio::test]
async fn same_name_different_ids_are_both_stored() {
    let pool = migrated_pool().await;

    insert_favorite(&pool, &favorite("p1", "Starbucks")).await.unwrap();
    insert_favorite(&pool, &favorite("p2", "Starbucks")).await.unwrap();

    assert_eq!(list_favorites(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let pool = migrated_pool().await;
    insert_favorite(&pool, &favorite("p1", "Gone soon")).await.unwrap();

    assert!(delete_favorite(&pool, "p1").await.unwrap());
    assert!(!delete_favorite(&pool, "p1").await.unwrap());
    assert!(get_favorite(&pool, "p1").await.unwrap().is_none());
}

#[tokio::test]
async fn repository_fetch_all_returns_entities() {
    let pool = migrated_pool().await;
    let repo = SqliteFavorites::new(pool);

    repo.insert(&favorite("a", "Alpha")).await.unwrap();
    repo.insert(&favorite("b", "Beta")).await.unwrap();
    repo.delete_by_id("missing").await.unwrap();

    let all = repo.fetch_all().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"a") && ids.contains(&"b"));
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_preferences_default_to_unset() {
    let pool = migrated_pool().await;
    assert_eq!(
        load_search_preferences(&pool).await.unwrap(),
        SearchCriteria::default()
    );
}

#[tokio::test]
async fn search_preferences_round_trip_and_clear() {
    let pool = migrated_pool().await;
    let criteria = SearchCriteria::new(PlaceCategory::Museum, PriceTier::new(3).unwrap());

    save_search_preferences(&pool, &criteria).await.unwrap();
    assert_eq!(load_search_preferences(&pool).await.unwrap(), criteria);

    let partial = SearchCriteria {
        category: Some(PlaceCategory::Cafe),
        price_tier: None,
    };
    save_search_preferences(&pool, &partial).await.unwrap();
    assert_eq!(load_search_preferences(&pool).await.unwrap(), partial);
}

#[tokio::test]
async fn unreadable_preference_is_treated_as_unset() {
    let pool = migrated_pool().await;
    sqlx::query("INSERT INTO preferences (key, value) VALUES ('search.price_tier', '9')")
        .execute(&pool)
        .await
        .unwrap();

    let loaded = load_search_preferences(&pool).await.unwrap();
    assert!(loaded.price_tier.is_none());
}

#[tokio::test]
async fn distance_unit_round_trips() {
    let pool = migrated_pool().await;
    assert_eq!(load_distance_unit(&pool).await.unwrap(), DistanceUnit::Metric);

    save_distance_unit(&pool, DistanceUnit::Imperial).await.unwrap();
    assert_eq!(load_distance_unit(&pool).await.unwrap(), DistanceUnit::Imperial);

    save_distance_unit(&pool, DistanceUnit::Metric).await.unwrap();
    assert_eq!(load_distance_unit(&pool).await.unwrap(), DistanceUnit::Metric);
}
