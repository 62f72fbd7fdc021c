pub mod client;
pub mod error;
pub mod normalize;
pub mod search;
pub mod status;
pub mod types;

pub use client::PlacesClient;
pub use error::{DecodeFailure, MissingInput, SearchError};
pub use normalize::normalize_place;
pub use search::{select_delta, GeoSearchEngine, PlaceSearch, SearchQuery};
pub use status::ProviderStatus;
pub use types::{NearbySearchResponse, PlaceDetails, PlaceResult, PlaceReview};
