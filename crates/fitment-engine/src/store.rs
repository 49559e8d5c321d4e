//! The engine's view of catalog and persistence collaborators.
//!
//! [`FitmentStore`] is the only seam through which the engine touches
//! the outside world: mapping-rule storage, the two reference
//! catalogs, and the fitment table. The engine treats the catalogs as
//! read-only. A full in-memory implementation lives here as well; it
//! backs the engine's own tests and any caller that wants to run the
//! pipeline without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use fitment_core::{
    MappingRule, PartTerminology, ReferencePosition, ReferenceVehicle, ValidationResult,
};

use crate::error::CatalogError;

/// Storage and catalog access used by the engine.
///
/// `find_vehicles` filters are conjunctive; `None` means "any".
/// String filters compare case-insensitively. Implementations must not
/// mutate catalog data on the engine's behalf.
pub trait FitmentStore: Send + Sync {
    fn load_mapping_rules(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MappingRule>, CatalogError>> + Send;

    fn find_vehicles(
        &self,
        year: Option<i32>,
        make: Option<&str>,
        model: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<ReferenceVehicle>, CatalogError>> + Send;

    fn get_terminology(
        &self,
        terminology_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<PartTerminology>, CatalogError>> + Send;

    fn positions_for_terminology(
        &self,
        terminology_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ReferencePosition>, CatalogError>> + Send;

    /// Persists validated results for a product. Only results carrying
    /// a fitment are written; the return value is the number of rows
    /// actually stored.
    fn save_fitments(
        &self,
        product_id: i64,
        results: &[ValidationResult],
    ) -> impl std::future::Future<Output = Result<usize, CatalogError>> + Send;
}

/// In-memory [`FitmentStore`] with fixture data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: Vec<MappingRule>,
    vehicles: Vec<ReferenceVehicle>,
    terminologies: Vec<PartTerminology>,
    positions: HashMap<i64, Vec<ReferencePosition>>,
    saved: Mutex<Vec<(i64, Vec<ValidationResult>)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<MappingRule>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_vehicles(mut self, vehicles: Vec<ReferenceVehicle>) -> Self {
        self.vehicles = vehicles;
        self
    }

    /// Registers a terminology together with its valid positions.
    #[must_use]
    pub fn with_terminology(
        mut self,
        terminology: PartTerminology,
        positions: Vec<ReferencePosition>,
    ) -> Self {
        self.positions.insert(terminology.id, positions);
        self.terminologies.push(terminology);
        self
    }

    /// Everything passed to [`FitmentStore::save_fitments`] so far, in
    /// call order.
    #[must_use]
    pub fn saved(&self) -> Vec<(i64, Vec<ValidationResult>)> {
        match self.saved.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FitmentStore for MemoryStore {
    async fn load_mapping_rules(&self) -> Result<Vec<MappingRule>, CatalogError> {
        Ok(self.rules.clone())
    }

    async fn find_vehicles(
        &self,
        year: Option<i32>,
        make: Option<&str>,
        model: Option<&str>,
    ) -> Result<Vec<ReferenceVehicle>, CatalogError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|vehicle| year.is_none_or(|y| vehicle.year == y))
            .filter(|vehicle| make.is_none_or(|m| vehicle.make.eq_ignore_ascii_case(m)))
            .filter(|vehicle| model.is_none_or(|m| vehicle.model.eq_ignore_ascii_case(m)))
            .cloned()
            .collect())
    }

    async fn get_terminology(
        &self,
        terminology_id: i64,
    ) -> Result<Option<PartTerminology>, CatalogError> {
        Ok(self
            .terminologies
            .iter()
            .find(|terminology| terminology.id == terminology_id)
            .cloned())
    }

    async fn positions_for_terminology(
        &self,
        terminology_id: i64,
    ) -> Result<Vec<ReferencePosition>, CatalogError> {
        Ok(self.positions.get(&terminology_id).cloned().unwrap_or_default())
    }

    async fn save_fitments(
        &self,
        product_id: i64,
        results: &[ValidationResult],
    ) -> Result<usize, CatalogError> {
        let stored: Vec<ValidationResult> = results
            .iter()
            .filter(|result| result.fitment.is_some())
            .cloned()
            .collect();
        let count = stored.len();
        let mut guard = match self.saved.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((product_id, stored));
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use fitment_core::{PositionGroup, ValidationStatus};

    use super::*;

    fn vehicle(id: i64, year: i32, make: &str, model: &str) -> ReferenceVehicle {
        ReferenceVehicle {
            id,
            year,
            make: make.to_string(),
            model: model.to_string(),
            submodel: None,
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_vehicles(vec![
            vehicle(1, 2005, "Jeep", "Grand Cherokee"),
            vehicle(2, 2006, "Jeep", "Grand Cherokee"),
            vehicle(3, 2006, "Jeep", "Wrangler"),
            vehicle(4, 2006, "Dodge", "Durango"),
        ])
    }

    #[tokio::test]
    async fn vehicle_filters_are_conjunctive() {
        let s = store();
        let all = s.find_vehicles(None, None, None).await.expect("query");
        assert_eq!(all.len(), 4);

        let jeeps_2006 = s
            .find_vehicles(Some(2006), Some("jeep"), None)
            .await
            .expect("query");
        assert_eq!(jeeps_2006.len(), 2);

        let gc = s
            .find_vehicles(None, Some("JEEP"), Some("grand cherokee"))
            .await
            .expect("query");
        assert_eq!(gc.len(), 2);
    }

    #[tokio::test]
    async fn unknown_terminology_is_none_and_has_no_positions() {
        let s = MemoryStore::new();
        assert!(s.get_terminology(99).await.expect("query").is_none());
        assert!(s
            .positions_for_terminology(99)
            .await
            .expect("query")
            .is_empty());
    }

    #[tokio::test]
    async fn save_records_calls_and_skips_fitmentless_results() {
        let s = MemoryStore::new();
        let results = vec![
            ValidationResult::batch_failure("nope"),
            ValidationResult::judged(
                ValidationStatus::Valid,
                "ok",
                fitment_core::ConcreteFitment {
                    year: 2006,
                    make: "Jeep".to_string(),
                    vehicle_code: "WK".to_string(),
                    model: "Grand Cherokee".to_string(),
                    position: PositionGroup::NotApplicable,
                    terminology_id: 1,
                },
            ),
        ];
        let written = s.save_fitments(10, &results).await.expect("save");
        assert_eq!(written, 1);
        let saved = s.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, 10);
        assert_eq!(saved[0].1.len(), 1);
    }
}
