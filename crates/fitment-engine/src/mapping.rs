//! The in-memory mapping table and rule matching.
//!
//! Matching direction is fixed: a rule's `pattern` must occur inside
//! the application's vehicle text, case-insensitively. The vehicle
//! text is never searched for inside the pattern. All matching rules
//! are returned, ordered by priority (descending), then pattern length
//! (longest first), then the rule's position in the table, so repeated
//! runs over the same table produce identical candidate lists.

use fitment_core::{MappingRule, VehicleCandidate};

use crate::error::ParseError;

/// Snapshot of the active mapping rules, in their configured order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    #[must_use]
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds every active rule whose pattern occurs in `vehicle_text`
    /// and returns the corresponding vehicle candidates in match order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoMappingMatch`] when no rule matches;
    /// unmapped vehicle text means the rule set has a gap, and that
    /// must surface rather than produce zero fitments silently.
    pub fn find_model_mappings(
        &self,
        vehicle_text: &str,
    ) -> Result<Vec<VehicleCandidate>, ParseError> {
        let haystack = vehicle_text.to_lowercase();
        let mut matched: Vec<(usize, &MappingRule)> = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.active && !rule.pattern.is_empty())
            .filter(|(_, rule)| haystack.contains(&rule.pattern.to_lowercase()))
            .collect();
        if matched.is_empty() {
            return Err(ParseError::NoMappingMatch {
                vehicle_text: vehicle_text.to_string(),
            });
        }
        matched.sort_by(|(ia, a), (ib, b)| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| pattern_weight(b).cmp(&pattern_weight(a)))
                .then_with(|| ia.cmp(ib))
        });
        Ok(matched
            .into_iter()
            .map(|(_, rule)| VehicleCandidate {
                make: rule.make.clone(),
                vehicle_code: rule.vehicle_code.clone(),
                model: rule.model.clone(),
            })
            .collect())
    }
}

/// Specificity tie-break: longer patterns are assumed to be more
/// specific. Measured in characters, not bytes.
fn pattern_weight(rule: &MappingRule) -> usize {
    rule.pattern.chars().count()
}
