//! Validation of concrete fitments against the reference catalogs.
//!
//! Checks run in severity order and the first hit decides the verdict:
//! a vehicle absent from the catalog is an ERROR, an unrecognized or
//! unresolved position is a WARNING, everything else is VALID. Every
//! verdict is a value; only structurally broken fitments (which
//! indicate a bug upstream, not bad source data) raise an error.

use fitment_core::{
    ConcreteFitment, ReferencePosition, ReferenceVehicle, ValidationResult, ValidationStatus,
};

use crate::error::EngineError;

/// Judges one fitment against the vehicle rows for its (make, model)
/// and the position names valid for its part terminology.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFitment`] when the fitment itself is
/// malformed (non-positive year, blank make or model). Catalog misses
/// are verdicts, not errors.
pub fn validate(
    fitment: &ConcreteFitment,
    candidate_vehicles: &[ReferenceVehicle],
    valid_positions: &[ReferencePosition],
) -> Result<ValidationResult, EngineError> {
    if fitment.year <= 0 {
        return Err(EngineError::InvalidFitment {
            reason: format!("year {} is not a positive calendar year", fitment.year),
        });
    }
    if fitment.make.trim().is_empty() || fitment.model.trim().is_empty() {
        return Err(EngineError::InvalidFitment {
            reason: "make and model must be non-empty".to_string(),
        });
    }

    let vehicle_matches = candidate_vehicles
        .iter()
        .filter(|vehicle| {
            vehicle.year == fitment.year
                && vehicle.make.eq_ignore_ascii_case(&fitment.make)
                && vehicle.model.eq_ignore_ascii_case(&fitment.model)
        })
        .count();
    if vehicle_matches == 0 {
        return Ok(ValidationResult::judged(
            ValidationStatus::Error,
            format!(
                "no {} {} {} in the vehicle catalog",
                fitment.year, fitment.make, fitment.model
            ),
            fitment.clone(),
        ));
    }

    let label = fitment.position.label();
    let position_known = valid_positions
        .iter()
        .any(|position| position.name.eq_ignore_ascii_case(&label));
    if !position_known {
        return Ok(ValidationResult::judged(
            ValidationStatus::Warning,
            format!("position '{label}' is not recognized for this part terminology"),
            fitment.clone(),
        ));
    }

    if fitment.position.is_varies() {
        return Ok(ValidationResult::judged(
            ValidationStatus::Warning,
            "position varies with application and needs manual review".to_string(),
            fitment.clone(),
        ));
    }

    Ok(ValidationResult::judged(
        ValidationStatus::Valid,
        format!(
            "{} {} {} ({label}) verified against the reference catalogs",
            fitment.year, fitment.make, fitment.model
        ),
        fitment.clone(),
    ))
}
