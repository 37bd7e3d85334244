pub mod app_config;
pub mod config;
pub mod gazetteer;
pub mod geo;
pub mod places;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use gazetteer::{load_gazetteer, normalize_locality, Gazetteer, GazetteerEntry};
pub use geo::{Coordinate, CoordinateSource, GeocodeResult, GeocodeStatus};
pub use places::{ImageDelivery, Place, SearchPage, MAX_PAGE_SIZE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read gazetteer file {path}: {source}")]
    GazetteerFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gazetteer file: {0}")]
    GazetteerFileParse(#[source] serde_yaml::Error),

    #[error("gazetteer validation failed: {0}")]
    Validation(String),
}
