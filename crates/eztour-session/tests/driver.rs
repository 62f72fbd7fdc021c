//! Integration tests for `SearchDriver`: scripted engines for session
//! behaviour, and a wiremock-backed engine for the end-to-end pagination flow.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use eztour_core::{Candidate, PlaceCategory, Position, PriceTier};
use eztour_places::{
    GeoSearchEngine, MissingInput, PlaceSearch, PlacesClient, ProviderStatus, SearchError,
    SearchQuery,
};
use eztour_session::{
    AuthorizationStatus, LocationAuthorizationController, LocationPlatform, SearchDriver,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct NoopPlatform;

impl LocationPlatform for NoopPlatform {
    fn request_authorization(&self) {}
    fn start_updating_location(&self) {}
}

#[derive(Default)]
struct ScriptedSearch {
    responses: Mutex<VecDeque<Result<Vec<Candidate>, SearchError>>>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl ScriptedSearch {
    fn with(responses: Vec<Result<Vec<Candidate>, SearchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::default(),
        }
    }

    fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl PlaceSearch for ScriptedSearch {
    fn fetch(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, SearchError>> + Send {
        self.queries.lock().unwrap().push(query.clone());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![]));
        async move { next }
    }
}

impl PlaceSearch for &ScriptedSearch {
    fn fetch(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, SearchError>> + Send {
        (**self).fetch(query)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tier(v: i64) -> PriceTier {
    PriceTier::new(v).unwrap()
}

fn candidate(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Place {id}"),
        position: Position::new(0.0, 0.0),
        price_tier: Some(tier(2)),
        rating: None,
        is_open_now: None,
        photos: vec![],
        distance_from_user: None,
    }
}

fn authorized_controller(position: Position) -> LocationAuthorizationController<NoopPlatform> {
    let mut controller = LocationAuthorizationController::new(NoopPlatform);
    controller
        .handle_authorization_change(AuthorizationStatus::NotDetermined)
        .unwrap();
    controller
        .handle_authorization_change(AuthorizationStatus::AuthorizedWhenInUse)
        .unwrap();
    controller.handle_location_update(&[position]);
    controller
}

fn place(id: &str, price_level: i64) -> serde_json::Value {
    json!({
        "place_id": id,
        "name": format!("Place {id}"),
        "geometry": { "location": { "lat": 40.71, "lng": -74.0 } },
        "price_level": price_level
    })
}

// ---------------------------------------------------------------------------
// Scripted engine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_fetch_without_position() {
    let engine = ScriptedSearch::default();
    let controller = LocationAuthorizationController::new(NoopPlatform);
    let mut driver = SearchDriver::new(&engine, controller.subscribe());

    driver.select_criteria(PlaceCategory::Cafe, tier(1));
    assert_eq!(driver.search().await.unwrap(), 0);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn latest_position_is_used_for_each_search() {
    let engine = ScriptedSearch::default();
    let controller = authorized_controller(Position::new(1.0, 1.0));
    let mut driver = SearchDriver::new(&engine, controller.subscribe());
    driver.select_criteria(PlaceCategory::Cafe, tier(1));

    driver.search().await.unwrap();
    controller.handle_location_update(&[Position::new(2.0, 2.0), Position::new(3.0, 3.0)]);
    driver.load_more().await.unwrap();

    let queries = engine.queries.lock().unwrap();
    assert_eq!(queries[0].position, Some(Position::new(1.0, 1.0)));
    assert_eq!(queries[1].position, Some(Position::new(3.0, 3.0)));
    assert_eq!(queries[1].radius.meters(), 6500);
}

#[tokio::test]
async fn wait_for_position_returns_published_sample() {
    let engine = ScriptedSearch::default();
    let controller = authorized_controller(Position::new(7.0, 8.0));
    let mut driver = SearchDriver::new(&engine, controller.subscribe());

    assert_eq!(driver.wait_for_position().await, Some(Position::new(7.0, 8.0)));
    assert_eq!(driver.session().position(), Some(Position::new(7.0, 8.0)));
}

#[tokio::test]
async fn failure_is_returned_and_results_kept() {
    let engine = ScriptedSearch::with(vec![
        Ok(vec![candidate("a")]),
        Err(SearchError::Provider {
            status: ProviderStatus::OverQuota,
            message: None,
        }),
    ]);
    let controller = authorized_controller(Position::new(0.0, 0.0));
    let mut driver = SearchDriver::new(&engine, controller.subscribe());
    driver.select_criteria(PlaceCategory::Bar, tier(2));

    assert_eq!(driver.search().await.unwrap(), 1);
    let err = driver.load_more().await.unwrap_err();

    assert!(matches!(err, SearchError::Provider { .. }));
    assert_eq!(driver.session().candidates().len(), 1);
    assert!(!driver.session().is_loading());
    assert!(driver
        .session()
        .last_failure()
        .is_some_and(|m| m.contains("OVER_QUERY_LIMIT")));
}

#[tokio::test]
async fn engine_precondition_is_silent() {
    let engine = ScriptedSearch::with(vec![Err(SearchError::Precondition(
        MissingInput::Position,
    ))]);
    let controller = authorized_controller(Position::new(0.0, 0.0));
    let mut driver = SearchDriver::new(&engine, controller.subscribe());
    driver.select_criteria(PlaceCategory::Bar, tier(2));

    assert_eq!(driver.search().await.unwrap(), 0);
    assert!(driver.session().last_failure().is_none());
    assert!(!driver.session().is_loading());
}

#[tokio::test]
async fn load_more_at_ceiling_makes_no_call() {
    let engine = ScriptedSearch::default();
    let controller = authorized_controller(Position::new(0.0, 0.0));
    let mut driver = SearchDriver::new(&engine, controller.subscribe());
    driver.select_criteria(PlaceCategory::Park, tier(0));

    for _ in 0..3 {
        driver.load_more().await.unwrap();
    }
    assert_eq!(driver.session().radius().meters(), 15000);
    assert_eq!(engine.calls(), 3);

    assert_eq!(driver.load_more().await.unwrap(), 0);
    assert_eq!(engine.calls(), 3);
}

// ---------------------------------------------------------------------------
// Real engine against a mock provider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn paginates_filters_dedups_and_survives_quota_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("radius", "1500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [place("a", 2), place("b", 2), place("c", 3)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("radius", "6500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [place("b", 2), place("d", 2)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("radius", "11500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_QUERY_LIMIT",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        PlacesClient::with_base_url("test-key", 5, &server.uri(), "eztour-test/0.1").unwrap();
    let controller = authorized_controller(Position::new(40.7128, -74.006));
    let mut driver = SearchDriver::new(GeoSearchEngine::new(client), controller.subscribe());
    driver.select_criteria(PlaceCategory::Restaurant, tier(2));

    assert_eq!(driver.search().await.unwrap(), 2);
    assert_eq!(driver.load_more().await.unwrap(), 1);

    let err = driver.load_more().await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::Provider {
            status: ProviderStatus::OverQuota,
            ..
        }
    ));

    let session = driver.into_session();
    let mut ids: Vec<&str> = session.candidates().iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["a", "b", "d"]);
    assert_eq!(session.radius().meters(), 11500);
}
