//! The durable favorite record and its conversion to and from [`Candidate`].

use serde::{Deserialize, Serialize};

use crate::types::{Candidate, Photo, Position, PriceTier};

/// A place the user saved. Unlike a [`Candidate`] every numeric and boolean
/// field is concrete: absent values are defaulted when the favorite is
/// created. At most one photo (the candidate's first) is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntity {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price_tier: u8,
    pub rating: f64,
    pub is_open_now: bool,
    pub photo: Option<Photo>,
}

impl FavoriteEntity {
    /// Builds a favorite from a search candidate, defaulting a missing price
    /// tier to `0`, rating to `0.0` and open-now to `false`.
    #[must_use]
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            latitude: candidate.position.latitude,
            longitude: candidate.position.longitude,
            price_tier: candidate.price_tier.map_or(0, PriceTier::value),
            rating: candidate.rating.unwrap_or(0.0),
            is_open_now: candidate.is_open_now.unwrap_or(false),
            photo: candidate.photos.first().cloned(),
        }
    }

    /// Converts back into the candidate shape used by search results.
    ///
    /// A stored tier outside `0..=4` comes back as "tier unknown".
    #[must_use]
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            id: self.id.clone(),
            name: self.name.clone(),
            position: Position::new(self.latitude, self.longitude),
            price_tier: PriceTier::new(i64::from(self.price_tier)).ok(),
            rating: Some(self.rating),
            is_open_now: Some(self.is_open_now),
            photos: self.photo.iter().cloned().collect(),
            distance_from_user: None,
        }
    }
}

impl From<&Candidate> for FavoriteEntity {
    fn from(candidate: &Candidate) -> Self {
        Self::from_candidate(candidate)
    }
}
