use eztour_core::{AppConfig, Environment};

use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url, "eztour-test/0.1")
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_endpoint_and_key() {
    let client = test_client("https://maps.example.com/api/place");
    let url = client
        .build_url("nearbysearch/json", &[("radius", "1500")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/api/place/nearbysearch/json?radius=1500&key=test-key"
    );
}

#[test]
fn build_url_tolerates_trailing_slash() {
    let client = test_client("https://maps.example.com/api/place/");
    let url = client.build_url("photo", &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/api/place/photo?key=test-key"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://maps.example.com");
    let url = client
        .build_url("nearbysearch/json", &[("location", "1.5,-2.25")])
        .unwrap();
    assert!(
        url.as_str().contains("location=1.5%2C-2.25"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn photo_url_carries_width_and_reference() {
    let client = test_client("https://maps.example.com/api/place");
    let url = client.photo_url("AbC123", 400).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/api/place/photo?maxwidth=400&photo_reference=AbC123&key=test-key"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("k", 30, "not a url", "ua");
    assert!(matches!(result, Err(SearchError::InvalidBaseUrl { .. })));
}

#[test]
fn provider_status_ok_passes() {
    let body = r#"{"status": "OK", "results": []}"#;
    assert_eq!(
        PlacesClient::check_provider_status(body, "test").unwrap(),
        ProviderStatus::Ok
    );
}

#[test]
fn provider_status_over_quota_is_rejected() {
    let body = r#"{"status": "OVER_QUERY_LIMIT", "results": [], "error_message": "slow down"}"#;
    let err = PlacesClient::check_provider_status(body, "test").unwrap_err();
    assert!(matches!(
        err,
        SearchError::Provider { status: ProviderStatus::OverQuota, message: Some(ref m) } if m == "slow down"
    ));
}

#[test]
fn missing_status_field_is_a_decode_error() {
    let err = PlacesClient::check_provider_status(r#"{"results": []}"#, "test").unwrap_err();
    assert_eq!(
        err.decode_failure(),
        Some(crate::error::DecodeFailure::MissingField)
    );
}

fn app_config(api_key: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        places_api_key: api_key.map(str::to_string),
        places_base_url: "https://maps.example.com/api/place".to_string(),
        places_request_timeout_secs: 5,
        places_user_agent: "eztour-test/0.1".to_string(),
        places_photo_max_width: 400,
        db_max_connections: 1,
        db_min_connections: 1,
        db_acquire_timeout_secs: 5,
    }
}

#[test]
fn from_app_config_uses_configured_base_url_and_key() {
    let client = PlacesClient::from_app_config(&app_config(Some("cfg-key"))).unwrap();
    let url = client.photo_url("ref", 400).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/api/place/photo?maxwidth=400&photo_reference=ref&key=cfg-key"
    );
}

#[test]
fn from_app_config_requires_api_key() {
    let result = PlacesClient::from_app_config(&app_config(None));
    assert!(matches!(result, Err(SearchError::MissingApiKey)));
}
