//! Cross-product assembly of concrete fitments.

use fitment_core::{ConcreteFitment, PositionGroup, VehicleCandidate};

/// Builds the full cross product of years, vehicle candidates, and
/// position groups. Order is deterministic: years ascending (as
/// given), then candidate order, then position order.
#[must_use]
pub fn assemble(
    years: &[i32],
    candidates: &[VehicleCandidate],
    positions: &[PositionGroup],
    terminology_id: i64,
) -> Vec<ConcreteFitment> {
    let mut fitments = Vec::with_capacity(years.len() * candidates.len() * positions.len());
    for year in years {
        for candidate in candidates {
            for position in positions {
                fitments.push(ConcreteFitment {
                    year: *year,
                    make: candidate.make.clone(),
                    vehicle_code: candidate.vehicle_code.clone(),
                    model: candidate.model.clone(),
                    position: position.clone(),
                    terminology_id,
                });
            }
        }
    }
    fitments
}

#[cfg(test)]
mod tests {
    use fitment_core::PositionAxis;

    use super::*;

    fn candidate(make: &str, code: &str, model: &str) -> VehicleCandidate {
        VehicleCandidate {
            make: make.to_string(),
            vehicle_code: code.to_string(),
            model: model.to_string(),
        }
    }

    #[test]
    fn cross_product_size_and_order() {
        let years = vec![2005, 2006];
        let candidates = vec![
            candidate("Jeep", "WK", "Grand Cherokee"),
            candidate("Jeep", "WJ", "Grand Cherokee"),
        ];
        let positions = vec![
            PositionGroup::from_axes([PositionAxis::Left]),
            PositionGroup::from_axes([PositionAxis::Right]),
        ];
        let fitments = assemble(&years, &candidates, &positions, 7);
        assert_eq!(fitments.len(), 8);
        // Outermost loop is years, innermost is positions.
        assert_eq!(fitments[0].year, 2005);
        assert_eq!(fitments[0].vehicle_code, "WK");
        assert_eq!(fitments[0].position.label(), "Left");
        assert_eq!(fitments[1].position.label(), "Right");
        assert_eq!(fitments[2].vehicle_code, "WJ");
        assert_eq!(fitments[4].year, 2006);
        assert!(fitments.iter().all(|f| f.terminology_id == 7));
    }

    #[test]
    fn six_years_one_vehicle_two_positions_is_twelve() {
        let years: Vec<i32> = (2005..=2010).collect();
        let candidates = vec![candidate("Jeep", "WK", "Grand Cherokee")];
        let positions = vec![
            PositionGroup::from_axes([
                PositionAxis::Left,
                PositionAxis::Front,
                PositionAxis::Upper,
            ]),
            PositionGroup::from_axes([
                PositionAxis::Right,
                PositionAxis::Front,
                PositionAxis::Upper,
            ]),
        ];
        let fitments = assemble(&years, &candidates, &positions, 1);
        assert_eq!(fitments.len(), 12);
    }

    #[test]
    fn empty_inputs_produce_no_fitments() {
        let positions = vec![PositionGroup::NotApplicable];
        assert!(assemble(&[], &[candidate("Jeep", "WK", "GC")], &positions, 1).is_empty());
        assert!(assemble(&[2005], &[], &positions, 1).is_empty());
    }
}
