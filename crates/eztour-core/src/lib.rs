pub mod app_config;
pub mod config;
pub mod favorite;
pub mod ranking;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use favorite::FavoriteEntity;
pub use ranking::{format_distance, haversine_meters, rank, DistanceUnit};
pub use types::{Candidate, CoreError, Photo, PlaceCategory, Position, PriceTier, Radius, SearchCriteria};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
