//! Shared domain types and configuration for the fitment workspace.
//!
//! Everything here is pure data and validation: the engine, database,
//! and CLI crates all depend on this crate, and it depends on nothing
//! but serde and the YAML parser.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod fitment;
pub mod mappings;
pub mod position;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use fitment::{
    ConcreteFitment, MappingRule, ParsedApplication, PartTerminology, ReferencePosition,
    ReferenceVehicle, ValidationResult, ValidationStatus, VehicleCandidate,
};
pub use mappings::{
    load_mappings, validate_mappings, MappingConfig, MappingsFile, MAPPING_FIELD_SEPARATOR,
};
pub use position::{
    AxisDimension, PositionAxis, PositionGroup, NOT_APPLICABLE_LABEL, VARIES_LABEL,
};

/// Errors raised while loading configuration, either from the process
/// environment or from the mappings YAML file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("cannot read mappings file {path}: {source}")]
    MappingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse mappings file: {0}")]
    MappingsFileParse(#[from] serde_yaml::Error),

    #[error("invalid mappings configuration: {0}")]
    Validation(String),
}
