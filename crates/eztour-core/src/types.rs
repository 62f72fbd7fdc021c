//! Place domain types shared by the search engine, the search session and the
//! favorites store.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid price tier {0}; must be between 0 and 4")]
    InvalidPriceTier(i64),

    #[error("unknown place category: '{0}'")]
    InvalidCategory(String),

    #[error("unknown distance unit: '{0}'; expected 'metric' or 'imperial'")]
    InvalidDistanceUnit(String),
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Relative cost level of a place, `0` (free) through `4` (very expensive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PriceTier(u8);

impl PriceTier {
    pub const MAX: u8 = 4;

    /// Validates `value` as a price tier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPriceTier`] when `value` is outside `0..=4`.
    pub fn new(value: i64) -> Result<Self, CoreError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(CoreError::InvalidPriceTier(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Human label for the tier.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Free",
            1 => "Inexpensive",
            2 => "Moderate",
            3 => "Expensive",
            _ => "Very Expensive",
        }
    }
}

impl TryFrom<i64> for PriceTier {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceTier> for u8 {
    fn from(tier: PriceTier) -> Self {
        tier.0
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed vocabulary of place categories the provider accepts as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Bar,
    Food,
    Establishment,
    Cafe,
    Lodging,
    Supermarket,
    Park,
    Museum,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 9] = [
        PlaceCategory::Restaurant,
        PlaceCategory::Bar,
        PlaceCategory::Food,
        PlaceCategory::Establishment,
        PlaceCategory::Cafe,
        PlaceCategory::Lodging,
        PlaceCategory::Supermarket,
        PlaceCategory::Park,
        PlaceCategory::Museum,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Bar => "bar",
            PlaceCategory::Food => "food",
            PlaceCategory::Establishment => "establishment",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Lodging => "lodging",
            PlaceCategory::Supermarket => "supermarket",
            PlaceCategory::Park => "park",
            PlaceCategory::Museum => "museum",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}

/// A provider photo reference. Only the token and pixel size are kept; image
/// bytes are fetched by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub reference: String,
    pub height: u32,
    pub width: u32,
}

/// A place returned by a nearby search.
///
/// Identity is the provider `id` alone: two candidates with the same id are
/// interchangeable in set operations regardless of their other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub price_tier: Option<PriceTier>,
    pub rating: Option<f64>,
    pub is_open_now: Option<bool>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Meters from the user; set by ranking, never by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_user: Option<f64>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Meter radius used for radius-expansion pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Radius(u32);

impl Radius {
    pub const FLOOR: u32 = 1_500;
    pub const CEILING: u32 = 15_000;
    pub const STEP: u32 = 5_000;

    #[must_use]
    pub fn floor() -> Self {
        Self(Self::FLOOR)
    }

    #[must_use]
    pub fn meters(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_at_ceiling(self) -> bool {
        self.0 >= Self::CEILING
    }

    /// The next radius, or `None` once the ceiling is reached.
    #[must_use]
    pub fn expanded(self) -> Option<Self> {
        if self.is_at_ceiling() {
            return None;
        }
        Some(Self((self.0 + Self::STEP).min(Self::CEILING)))
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::floor()
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// The user's chosen search filters. A fetch is only permitted once both
/// fields are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub category: Option<PlaceCategory>,
    pub price_tier: Option<PriceTier>,
}

impl SearchCriteria {
    #[must_use]
    pub fn new(category: PlaceCategory, price_tier: PriceTier) -> Self {
        Self {
            category: Some(category),
            price_tier: Some(price_tier),
        }
    }

    /// Both fields, when both are chosen.
    #[must_use]
    pub fn complete(&self) -> Option<(PlaceCategory, PriceTier)> {
        Some((self.category?, self.price_tier?))
    }
}
