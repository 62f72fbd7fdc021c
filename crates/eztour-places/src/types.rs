//! Nearby-search and place-details response types.
//!
//! These model the JSON returned by the provider's `nearbysearch` and
//! `details` endpoints. Only the fields this crate consumes are declared;
//! everything else in the payload is ignored.

use serde::Deserialize;

/// Just the `status` field, decoded before the rest of the body so that a
/// provider-side failure is reported as such rather than as a shape mismatch.
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Top-level `nearbysearch` response.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub results: Vec<PlaceResult>,
    pub status: String,
}

/// A single place record.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    pub geometry: Geometry,
    /// `0..=4` when the provider knows it.
    #[serde(default)]
    pub price_level: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub photos: Option<Vec<PlacePhoto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    /// One human-readable line per weekday; only sent by `details`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
    pub height: u32,
    pub width: u32,
}

/// Top-level `details` response.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub result: PlaceDetails,
    pub status: String,
}

/// The detail record for one place, limited to the requested `fields`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceReview {
    pub author_name: String,
    pub rating: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub relative_time_description: Option<String>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub time: Option<i64>,
}
