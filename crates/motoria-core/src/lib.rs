//! Domain types and configuration for the Motoria catalog service.

mod app_config;
mod config;
mod filters;
mod geo;
mod markets;

pub use app_config::{AppConfig, Environment, ResolverConfig};
pub use config::{load_app_config, load_app_config_from_env, load_resolver_config};
pub use filters::{CatalogState, LocationConstraint, UserLocation, VehicleFilters};
pub use geo::{level_label, GeoLevel, LEVEL_ORDER};
pub use markets::{load_markets_file, CityEntry, MarketsFile};

use thiserror::Error;

/// Errors produced while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read markets file {path}: {source}")]
    MarketsFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse markets file {path}: {source}")]
    MarketsFileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("duplicate city '{0}' in markets file")]
    DuplicateCity(String),
}
