//! Domain types for the fitment pipeline.
//!
//! These are the shapes that move between the parsing, expansion, and
//! validation stages. They are plain data: no stage-specific behavior
//! lives here, only the invariants the constructors can enforce cheaply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::PositionGroup;

/// Structured form of one raw application string.
///
/// Produced by the parser. `year_start <= year_end` always holds;
/// a single-year application has `year_start == year_end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedApplication {
    pub year_start: i32,
    pub year_end: i32,
    /// Vehicle description between the year token and the position
    /// segment, trimmed of whitespace and trailing punctuation.
    pub vehicle_text: String,
    /// Raw text inside the parenthesized position segment, if any.
    pub position_text: Option<String>,
    /// The application string exactly as received.
    pub original_text: String,
    /// Part terminology the application was submitted under.
    pub terminology_id: i64,
}

/// One vehicle interpretation of an application's free-text, produced by
/// a matching mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCandidate {
    pub make: String,
    pub vehicle_code: String,
    pub model: String,
}

/// A single, fully-expanded fitment: one year, one vehicle, one
/// position group, for one part terminology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteFitment {
    pub year: i32,
    pub make: String,
    pub vehicle_code: String,
    pub model: String,
    pub position: PositionGroup,
    pub terminology_id: i64,
}

/// Outcome class for a validated fitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Valid,
    Warning,
    Error,
}

impl ValidationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one fitment, or for one unprocessable batch entry.
///
/// `fitment` is always present for verdicts produced by validation; it
/// is `None` only for batch entries that failed before any fitment
/// could be assembled (for example a parse failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub message: String,
    pub fitment: Option<ConcreteFitment>,
}

impl ValidationResult {
    /// A verdict tied to a concrete fitment.
    #[must_use]
    pub fn judged(
        status: ValidationStatus,
        message: impl Into<String>,
        fitment: ConcreteFitment,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            fitment: Some(fitment),
        }
    }

    /// An error entry for a batch item that could not be processed at
    /// all. Carries no fitment.
    #[must_use]
    pub fn batch_failure(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Error,
            message: message.into(),
            fitment: None,
        }
    }
}

/// One free-text-to-vehicle mapping rule.
///
/// `pattern` is matched as a case-insensitive substring of the
/// application's vehicle text. Higher `priority` wins; inactive rules
/// are ignored by matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub pattern: String,
    pub make: String,
    pub vehicle_code: String,
    pub model: String,
    pub priority: i32,
    pub active: bool,
}

/// A row from the reference vehicle catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceVehicle {
    pub id: i64,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub submodel: Option<String>,
}

/// A part terminology (category) from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTerminology {
    pub id: i64,
    pub name: String,
}

/// A position name valid for some part terminology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePosition {
    pub id: i64,
    pub name: String,
}
