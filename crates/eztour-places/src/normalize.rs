//! Conversion of provider place records into [`Candidate`]s.

use eztour_core::{Candidate, Photo, Position, PriceTier};

use crate::types::PlaceResult;

/// Converts a decoded [`PlaceResult`] into a [`Candidate`].
///
/// A `price_level` outside `0..=4` is treated as unknown, which means the
/// candidate can never match a price filter.
#[must_use]
pub fn normalize_place(place: PlaceResult) -> Candidate {
    let price_tier = place.price_level.and_then(|level| {
        PriceTier::new(level)
            .map_err(|e| {
                tracing::debug!(place_id = %place.place_id, error = %e, "ignoring out-of-range price level");
            })
            .ok()
    });

    Candidate {
        id: place.place_id,
        name: place.name,
        position: Position::new(place.geometry.location.lat, place.geometry.location.lng),
        price_tier,
        rating: place.rating,
        is_open_now: place.opening_hours.and_then(|h| h.open_now),
        photos: place
            .photos
            .unwrap_or_default()
            .into_iter()
            .map(|p| Photo {
                reference: p.photo_reference,
                height: p.height,
                width: p.width,
            })
            .collect(),
        distance_from_user: None,
    }
}
