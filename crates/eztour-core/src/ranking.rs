//! Distance ranking of candidates relative to the user's position.
//!
//! Distances are great-circle (haversine) meters on a spherical Earth. The
//! display unit is always passed in by the caller; nothing here reads
//! persisted preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Candidate, CoreError, Position};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const MILES_PER_METER: f64 = 0.000_621_371;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

impl DistanceUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Metric => "metric",
            DistanceUnit::Imperial => "imperial",
        }
    }

    /// The other unit.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            DistanceUnit::Metric => DistanceUnit::Imperial,
            DistanceUnit::Imperial => DistanceUnit::Metric,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "km" => Ok(DistanceUnit::Metric),
            "imperial" | "mi" | "miles" => Ok(DistanceUnit::Imperial),
            _ => Err(CoreError::InvalidDistanceUnit(s.to_string())),
        }
    }
}

/// Great-circle distance between two positions in meters.
#[must_use]
pub fn haversine_meters(from: Position, to: Position) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Orders candidates nearest-first and annotates each with its distance.
///
/// Without a position the input order is returned unchanged and nothing is
/// annotated. Equal distances keep their input order.
#[must_use]
pub fn rank(candidates: &[Candidate], position: Option<Position>) -> Vec<Candidate> {
    let Some(origin) = position else {
        return candidates.to_vec();
    };

    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .cloned()
        .map(|mut c| {
            c.distance_from_user = Some(haversine_meters(origin, c.position));
            c
        })
        .collect();

    ranked.sort_by(|a, b| {
        let da = a.distance_from_user.unwrap_or(f64::INFINITY);
        let db = b.distance_from_user.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
    ranked
}

/// Renders a distance such as `"1.2 km away"` or `"0.7 mi away"`.
#[must_use]
pub fn format_distance(meters: f64, unit: DistanceUnit) -> String {
    match unit {
        DistanceUnit::Metric => format!("{:.1} km away", meters / 1000.0),
        DistanceUnit::Imperial => format!("{:.1} mi away", meters * MILES_PER_METER),
    }
}

impl Candidate {
    /// The formatted distance, when ranking has annotated one.
    #[must_use]
    pub fn distance_label(&self, unit: DistanceUnit) -> Option<String> {
        self.distance_from_user.map(|m| format_distance(m, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, latitude: f64, longitude: f64) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: id.to_uppercase(),
            position: Position::new(latitude, longitude),
            price_tier: None,
            rating: None,
            is_open_now: None,
            photos: vec![],
            distance_from_user: None,
        }
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = Position::new(51.5, -0.12);
        assert!(haversine_meters(p, p).abs() < 1e-6);
    }

    #[test]
    fn haversine_one_degree_latitude_is_about_111_km() {
        let d = haversine_meters(Position::new(0.0, 0.0), Position::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn rank_sorts_ascending_by_distance() {
        let origin = Position::new(40.0, -74.0);
        let input = vec![
            at("far", 40.05, -74.0),
            at("near", 40.001, -74.0),
            at("mid", 40.01, -74.0),
        ];

        let ranked = rank(&input, Some(origin));

        assert_eq!(ids(&ranked), ["near", "mid", "far"]);
        let distances: Vec<f64> = ranked
            .iter()
            .map(|c| c.distance_from_user.unwrap())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn rank_without_position_keeps_input_order_unannotated() {
        let input = vec![at("b", 1.0, 1.0), at("a", 0.0, 0.0), at("c", 2.0, 2.0)];
        let ranked = rank(&input, None);
        assert_eq!(ids(&ranked), ["b", "a", "c"]);
        assert!(ranked.iter().all(|c| c.distance_from_user.is_none()));
    }

    #[test]
    fn rank_is_stable_for_equal_distances() {
        let origin = Position::new(0.0, 0.0);
        let input = vec![
            at("east", 0.0, 0.01),
            at("north", 0.01, 0.0),
            at("west", 0.0, -0.01),
        ];
        let ranked = rank(&input, Some(origin));
        // north is not exactly equidistant on a sphere; east and west are.
        let east = ranked.iter().position(|c| c.id == "east").unwrap();
        let west = ranked.iter().position(|c| c.id == "west").unwrap();
        assert!(east < west);
    }

    #[test]
    fn format_metric_and_imperial() {
        assert_eq!(format_distance(1_234.0, DistanceUnit::Metric), "1.2 km away");
        assert_eq!(format_distance(1_609.344, DistanceUnit::Imperial), "1.0 mi away");
    }

    #[test]
    fn distance_label_needs_annotation() {
        let mut c = at("x", 0.0, 0.0);
        assert!(c.distance_label(DistanceUnit::Metric).is_none());
        c.distance_from_user = Some(500.0);
        assert_eq!(
            c.distance_label(DistanceUnit::Metric).as_deref(),
            Some("0.5 km away")
        );
    }

    #[test]
    fn unit_parses_aliases_and_toggles() {
        assert_eq!("mi".parse::<DistanceUnit>(), Ok(DistanceUnit::Imperial));
        assert_eq!("Metric".parse::<DistanceUnit>(), Ok(DistanceUnit::Metric));
        assert!("furlongs".parse::<DistanceUnit>().is_err());
        assert_eq!(DistanceUnit::Metric.toggled(), DistanceUnit::Imperial);
    }
}
