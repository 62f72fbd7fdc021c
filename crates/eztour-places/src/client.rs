//! HTTP client for the places provider's nearby-search, details and photo
//! endpoints.
//!
//! Wraps `reqwest` with credential handling, typed status checking and typed
//! response deserialization. Every JSON response has its top-level `"status"`
//! parsed into a [`ProviderStatus`]; failures surface as
//! [`SearchError::Provider`].

use std::time::Duration;

use eztour_core::{AppConfig, PlaceCategory, Position, Radius};
use reqwest::{header, Client, StatusCode, Url};

use crate::error::SearchError;
use crate::status::ProviderStatus;
use crate::types::{NearbySearchResponse, PlaceDetails, PlaceDetailsResponse, StatusEnvelope};

const NEARBY_SEARCH_PATH: &str = "nearbysearch/json";
const DETAILS_PATH: &str = "details/json";
const PHOTO_PATH: &str = "photo";
const DETAILS_FIELDS: &str =
    "name,formatted_address,formatted_phone_number,website,opening_hours,rating,reviews,photos";

/// Client for the places REST API.
///
/// Use [`PlacesClient::from_app_config`] in the application or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client from the `PLACES_*` settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingApiKey`] if no key is configured, and
    /// otherwise the same errors as [`PlacesClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SearchError> {
        let api_key = config
            .places_api_key
            .as_deref()
            .ok_or(SearchError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            config.places_request_timeout_secs,
            &config.places_base_url,
            &config.places_user_agent,
        )
    }

    /// Creates a client with a custom base URL and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so that `join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SearchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Runs one nearby search and returns the decoded page.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::UnexpectedStatus`] for any HTTP status other than 200.
    /// - [`SearchError::InvalidEncoding`] if the body is not UTF-8.
    /// - [`SearchError::Provider`] if the `status` field reports a failure.
    /// - [`SearchError::Decode`] if the body does not match the expected shape.
    pub async fn nearby_search(
        &self,
        position: Position,
        radius: Radius,
        category: PlaceCategory,
    ) -> Result<NearbySearchResponse, SearchError> {
        let location = position.to_string();
        let radius_str = radius.meters().to_string();
        let url = self.build_url(
            NEARBY_SEARCH_PATH,
            &[
                ("location", &location),
                ("radius", &radius_str),
                ("type", category.as_str()),
            ],
        )?;
        // Never put the URL itself in errors or logs: it carries the key.
        let context = format!("nearbysearch(location={location}, radius={radius_str}, type={category})");

        let body = self.request_text(url, &context).await?;
        Self::check_provider_status(&body, &context)?;

        serde_json::from_str::<NearbySearchResponse>(&body)
            .map_err(|e| SearchError::decode(context, e))
    }

    /// Fetches the detail record for one place id.
    ///
    /// Unlike a nearby search, `ZERO_RESULTS` is a failure here: there is no
    /// record to return.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`]; an unknown id surfaces as
    /// [`SearchError::Provider`] with [`ProviderStatus::NotFound`].
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, SearchError> {
        let url = self.build_url(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let context = format!("details(place_id={place_id})");

        let body = self.request_text(url, &context).await?;
        let status = Self::check_provider_status(&body, &context)?;
        if status == ProviderStatus::ZeroResults {
            return Err(SearchError::Provider {
                status,
                message: None,
            });
        }

        let response = serde_json::from_str::<PlaceDetailsResponse>(&body)
            .map_err(|e| SearchError::decode(context, e))?;
        tracing::debug!(place_id, reviews = response.result.reviews.len(), "place details fetched");
        Ok(response.result)
    }

    /// Builds the photo endpoint URL for a stored photo reference.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBaseUrl`] if the endpoint path cannot be
    /// joined onto the base URL.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> Result<Url, SearchError> {
        self.build_url(
            PHOTO_PATH,
            &[
                ("maxwidth", &max_width.to_string()),
                ("photo_reference", photo_reference),
            ],
        )
    }

    /// Joins `endpoint` onto the base URL and appends the query parameters,
    /// followed by the credential, all percent-encoded.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, SearchError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET, requires HTTP 200 and returns the body as UTF-8 text.
    async fn request_text(&self, url: Url, context: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                context: context.to_owned(),
            });
        }

        let bytes = response.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| SearchError::InvalidEncoding {
            context: context.to_owned(),
            source: e.utf8_error(),
        })
    }

    /// Decodes just the top-level `status`, rejects provider-side failures
    /// and returns the successful status.
    fn check_provider_status(body: &str, context: &str) -> Result<ProviderStatus, SearchError> {
        let envelope: StatusEnvelope =
            serde_json::from_str(body).map_err(|e| SearchError::decode(context, e))?;
        let status = ProviderStatus::parse(&envelope.status);
        if status.is_success() {
            return Ok(status);
        }
        tracing::warn!(%status, context, "places provider reported failure");
        Err(SearchError::Provider {
            status,
            message: envelope.error_message,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
