//! Error types for the fitment engine.

use thiserror::Error;

/// Failure to turn a raw application string into a structured form.
///
/// Each variant carries the offending text so batch reports can show
/// the operator what to fix in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("application text is empty")]
    EmptyInput,

    #[error("application does not start with a four-digit year: '{token}'")]
    NoYearToken { token: String },

    #[error("inverted year range {start}-{end}")]
    InvertedYearRange { start: i32, end: i32 },

    #[error("no vehicle description between the year token and the position segment")]
    EmptyVehicleText,

    #[error("no mapping rule matches vehicle text '{vehicle_text}'")]
    NoMappingMatch { vehicle_text: String },
}

/// Opaque wrapper for failures inside a catalog / persistence
/// collaborator. The engine neither inspects nor retries these; it
/// surfaces them with their source chain intact.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CatalogError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl CatalogError {
    pub fn new<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(source))
    }

    /// Builds a catalog error from a plain message, for collaborators
    /// without a structured error of their own.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self(text.into().into())
    }
}

/// Top-level engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("unknown part terminology id {terminology_id}")]
    UnknownTerminology { terminology_id: i64 },

    #[error("structurally invalid fitment: {reason}")]
    InvalidFitment { reason: String },

    #[error("mapping configuration unavailable: {reason}")]
    Configuration { reason: String },

    #[error("catalog access failed: {0}")]
    Catalog(#[from] CatalogError),
}
