pub mod app_config;
pub mod config;
pub mod cuisine;
pub mod filter;
pub mod geo;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, load_cuisine_table};
pub use cuisine::{CategoryMatcher, CuisineConfig, CuisineTable, BASELINE_EXCLUDED_TYPES};
pub use filter::{apply_filters, by_distance, by_excluded_categories, by_min_rating};
pub use geo::{distance_miles, meters_to_miles, miles_to_meters, EARTH_RADIUS_MILES};
pub use types::{Candidate, Coordinate, QueryFilters, MAX_RATING};

/// Validation failures for the domain value types.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid search radius {0} mi: must be a finite value greater than zero")]
    InvalidRadius(f64),

    #[error("invalid minimum rating {0}: must be within [0, 5]")]
    InvalidRating(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read cuisine file {path}: {source}")]
    CuisineFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cuisine file: {0}")]
    CuisineFileParse(#[from] serde_yaml::Error),

    #[error("cuisine table validation failed: {0}")]
    Validation(String),
}
