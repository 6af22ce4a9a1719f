pub mod app_config;
pub mod config;
pub mod coordinate;
pub mod distance;
pub mod place;
pub mod taxonomy;

pub use app_config::{AppConfig, Environment, RadiusSettings};
pub use config::{load_app_config, load_app_config_from_env, resolve_taxonomy};
pub use coordinate::{to_canonical, to_provider_order, Coordinate, ProviderConvention, RawPair};
pub use distance::{haversine_km, EARTH_RADIUS_KM};
pub use place::{Place, PlaceSource, Route};
pub use taxonomy::{load_taxonomy, PoiCategory, PoiFilter, Taxonomy, TaxonomyMatch};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read taxonomy file {path}: {source}")]
    TaxonomyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy file: {0}")]
    TaxonomyFileParse(#[source] serde_yaml::Error),

    #[error("taxonomy validation failed: {0}")]
    Validation(String),
}
