//! Postgres-backed implementation of the engine's store trait.

use sqlx::PgPool;

use fitment_core::{
    MappingRule, PartTerminology, ReferencePosition, ReferenceVehicle, ValidationResult,
};
use fitment_engine::{CatalogError, FitmentStore};

use crate::{fitments, mapping_rules, terminologies, vehicles};

/// [`FitmentStore`] over a Postgres pool.
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Debug, Clone)]
pub struct PgFitmentStore {
    pool: PgPool,
}

impl PgFitmentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl FitmentStore for PgFitmentStore {
    async fn load_mapping_rules(&self) -> Result<Vec<MappingRule>, CatalogError> {
        let rows = mapping_rules::list_active_mapping_rules(&self.pool)
            .await
            .map_err(CatalogError::new)?;
        Ok(rows
            .into_iter()
            .map(mapping_rules::MappingRuleRow::into_rule)
            .collect())
    }

    async fn find_vehicles(
        &self,
        year: Option<i32>,
        make: Option<&str>,
        model: Option<&str>,
    ) -> Result<Vec<ReferenceVehicle>, CatalogError> {
        let rows = vehicles::find_vehicles(&self.pool, year, make, model)
            .await
            .map_err(CatalogError::new)?;
        Ok(rows
            .into_iter()
            .map(vehicles::ReferenceVehicleRow::into_vehicle)
            .collect())
    }

    async fn get_terminology(
        &self,
        terminology_id: i64,
    ) -> Result<Option<PartTerminology>, CatalogError> {
        let row = terminologies::get_terminology(&self.pool, terminology_id)
            .await
            .map_err(CatalogError::new)?;
        Ok(row.map(terminologies::PartTerminologyRow::into_terminology))
    }

    async fn positions_for_terminology(
        &self,
        terminology_id: i64,
    ) -> Result<Vec<ReferencePosition>, CatalogError> {
        let rows = terminologies::list_positions_for_terminology(&self.pool, terminology_id)
            .await
            .map_err(CatalogError::new)?;
        Ok(rows
            .into_iter()
            .map(terminologies::ReferencePositionRow::into_position)
            .collect())
    }

    async fn save_fitments(
        &self,
        product_id: i64,
        results: &[ValidationResult],
    ) -> Result<usize, CatalogError> {
        fitments::insert_fitment_records(&self.pool, product_id, results)
            .await
            .map_err(CatalogError::new)
    }
}
