//! The mapping engine: orchestration of parse, expand, match,
//! assemble, validate, and save.
//!
//! The engine owns two pieces of shared state behind `tokio` locks:
//! the active mapping table and a bounded cache of part terminologies
//! with their valid positions. Reads take the read lock and clone what
//! they need, so no lock is ever held across an await into the store.
//! Replacing the mapping table is the single writer and atomically
//! invalidates the terminology cache.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::RwLock;

use fitment_core::{
    MappingRule, PartTerminology, ReferencePosition, ReferenceVehicle, ValidationResult,
    ValidationStatus,
};

use crate::error::EngineError;
use crate::mapping::MappingTable;
use crate::store::FitmentStore;
use crate::{assemble, expand, parse, validate};

/// Tunables for a [`MappingEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Persist WARNING results alongside VALID ones.
    pub persist_warnings: bool,
    /// Maximum number of cached terminologies before the cache resets.
    pub terminology_cache_cap: usize,
    /// Concurrent entries during batch processing.
    pub batch_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persist_warnings: true,
            terminology_cache_cap: 256,
            batch_concurrency: 4,
        }
    }
}

/// Tallies across every result of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounts {
    pub valid: usize,
    pub warning: usize,
    pub error: usize,
}

impl BatchCounts {
    fn record(&mut self, status: ValidationStatus) {
        match status {
            ValidationStatus::Valid => self.valid += 1,
            ValidationStatus::Warning => self.warning += 1,
            ValidationStatus::Error => self.error += 1,
        }
    }
}

/// Outcome of a batch run: per-input results keyed by the original
/// application string, plus overall tallies.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: HashMap<String, Vec<ValidationResult>>,
    pub counts: BatchCounts,
}

/// Outcome of persisting a result set.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Rows written by the store.
    pub written: usize,
    /// WARNING results skipped because persistence policy excludes them.
    pub skipped_warnings: usize,
    /// ERROR results, returned to the caller and never persisted.
    pub rejected: Vec<ValidationResult>,
}

struct TerminologyEntry {
    terminology: PartTerminology,
    positions: Vec<ReferencePosition>,
}

/// The fitment processing engine over some store `S`.
pub struct MappingEngine<S> {
    store: S,
    table: RwLock<MappingTable>,
    terminology_cache: RwLock<HashMap<i64, Arc<TerminologyEntry>>>,
    config: EngineConfig,
}

impl<S: FitmentStore> MappingEngine<S> {
    /// Creates an engine with an empty mapping table and default
    /// configuration. Call [`Self::configure`] or
    /// [`Self::refresh_mappings`] before processing.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            table: RwLock::new(MappingTable::default()),
            terminology_cache: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Replaces the mapping table with the given rules and clears the
    /// terminology cache. In-flight reads finish against the table
    /// they started with; later reads see only the new table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when `rules` is empty; a
    /// table with no rules would fail every application and almost
    /// certainly means the mapping source was missing.
    pub async fn configure(&self, rules: Vec<MappingRule>) -> Result<usize, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::Configuration {
                reason: "mapping rule set is empty".to_string(),
            });
        }
        let count = rules.len();
        let replacement = MappingTable::new(rules);
        {
            let mut table = self.table.write().await;
            *table = replacement;
        }
        self.terminology_cache.write().await.clear();
        tracing::info!(rules = count, "mapping table replaced");
        Ok(count)
    }

    /// Reloads the mapping table from the store.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when the store cannot
    /// produce the rules or produces none.
    pub async fn refresh_mappings(&self) -> Result<usize, EngineError> {
        let rules = self
            .store
            .load_mapping_rules()
            .await
            .map_err(|e| EngineError::Configuration {
                reason: format!("cannot load mapping rules: {e}"),
            })?;
        self.configure(rules).await
    }

    /// Runs one application string through the whole pipeline and
    /// returns one verdict per assembled fitment, in deterministic
    /// order: years ascending, then mapping candidates, then positions.
    ///
    /// # Errors
    ///
    /// Parse and mapping failures come back as
    /// [`EngineError::Parse`]; an unknown part terminology as
    /// [`EngineError::UnknownTerminology`]; store failures as
    /// [`EngineError::Catalog`].
    pub async fn process_application(
        &self,
        raw_text: &str,
        terminology_id: i64,
    ) -> Result<Vec<ValidationResult>, EngineError> {
        let parsed = parse::parse_application(raw_text, terminology_id)?;
        let years = expand::expand_year_range(parsed.year_start, parsed.year_end)?;
        let candidates = {
            let table = self.table.read().await;
            table.find_model_mappings(&parsed.vehicle_text)?
        };
        let positions = expand::extract_positions(parsed.position_text.as_deref());
        let fitments = assemble::assemble(&years, &candidates, &positions, terminology_id);

        let entry = self.terminology(terminology_id).await?;

        // One catalog query per distinct (make, model), not per fitment.
        let mut vehicles_by_model: HashMap<(String, String), Vec<ReferenceVehicle>> =
            HashMap::new();
        for candidate in &candidates {
            let key = (
                candidate.make.to_lowercase(),
                candidate.model.to_lowercase(),
            );
            if vehicles_by_model.contains_key(&key) {
                continue;
            }
            let vehicles = self
                .store
                .find_vehicles(None, Some(&candidate.make), Some(&candidate.model))
                .await?;
            vehicles_by_model.insert(key, vehicles);
        }

        let mut results = Vec::with_capacity(fitments.len());
        for fitment in &fitments {
            let key = (fitment.make.to_lowercase(), fitment.model.to_lowercase());
            let vehicles = vehicles_by_model.get(&key).map_or(&[][..], Vec::as_slice);
            results.push(validate::validate(fitment, vehicles, &entry.positions)?);
        }
        tracing::debug!(
            application = raw_text,
            terminology = %entry.terminology.name,
            fitments = results.len(),
            "processed application"
        );
        Ok(results)
    }

    /// Processes many application strings for one part terminology.
    ///
    /// Entries are isolated: a failing string becomes a single
    /// error-status result carrying its text, and every other entry
    /// still completes. Entries run concurrently up to the configured
    /// limit; the report is keyed by input string, so output is
    /// independent of completion order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownTerminology`] before any entry
    /// runs when the terminology id is not in the catalog, and
    /// [`EngineError::Catalog`] if that lookup itself fails.
    pub async fn batch_process(
        &self,
        raw_texts: &[String],
        terminology_id: i64,
    ) -> Result<BatchReport, EngineError> {
        // The whole batch shares one terminology; check it once up
        // front instead of failing every entry identically.
        self.terminology(terminology_id).await?;

        let outcomes: Vec<(String, Vec<ValidationResult>)> = stream::iter(raw_texts)
            .map(|text| async move {
                let results = match self.process_application(text, terminology_id).await {
                    Ok(results) => results,
                    Err(e) => {
                        tracing::warn!(application = %text, error = %e, "batch entry failed");
                        vec![ValidationResult::batch_failure(format!(
                            "cannot process '{text}': {e}"
                        ))]
                    }
                };
                (text.clone(), results)
            })
            .buffer_unordered(self.config.batch_concurrency.max(1))
            .collect()
            .await;

        let mut results: HashMap<String, Vec<ValidationResult>> =
            HashMap::with_capacity(outcomes.len());
        for (text, entry_results) in outcomes {
            results.insert(text, entry_results);
        }
        let mut counts = BatchCounts::default();
        for result in results.values().flatten() {
            counts.record(result.status);
        }
        tracing::info!(
            entries = raw_texts.len(),
            valid = counts.valid,
            warning = counts.warning,
            error = counts.error,
            "batch complete"
        );
        Ok(BatchReport { results, counts })
    }

    /// Persists results for a product, applying the warning policy.
    /// VALID results are always written, WARNING results only when
    /// `persist_warnings` is set, and ERROR results never; the caller
    /// gets the rejects back.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Catalog`] when the store write fails.
    pub async fn save_results(
        &self,
        product_id: i64,
        results: &[ValidationResult],
    ) -> Result<SaveOutcome, EngineError> {
        let mut accepted: Vec<ValidationResult> = Vec::new();
        let mut skipped_warnings = 0usize;
        let mut rejected: Vec<ValidationResult> = Vec::new();
        for result in results {
            match result.status {
                ValidationStatus::Valid => accepted.push(result.clone()),
                ValidationStatus::Warning if self.config.persist_warnings => {
                    accepted.push(result.clone());
                }
                ValidationStatus::Warning => skipped_warnings += 1,
                ValidationStatus::Error => rejected.push(result.clone()),
            }
        }
        let written = if accepted.is_empty() {
            0
        } else {
            self.store.save_fitments(product_id, &accepted).await?
        };
        tracing::info!(
            product_id,
            written,
            skipped_warnings,
            rejected = rejected.len(),
            "fitment results persisted"
        );
        Ok(SaveOutcome {
            written,
            skipped_warnings,
            rejected,
        })
    }

    async fn terminology(
        &self,
        terminology_id: i64,
    ) -> Result<Arc<TerminologyEntry>, EngineError> {
        {
            let cache = self.terminology_cache.read().await;
            if let Some(entry) = cache.get(&terminology_id) {
                return Ok(Arc::clone(entry));
            }
        }
        let Some(terminology) = self.store.get_terminology(terminology_id).await? else {
            return Err(EngineError::UnknownTerminology { terminology_id });
        };
        let positions = self.store.positions_for_terminology(terminology_id).await?;
        let entry = Arc::new(TerminologyEntry {
            terminology,
            positions,
        });
        let mut cache = self.terminology_cache.write().await;
        if cache.len() >= self.config.terminology_cache_cap {
            // Bounded by wholesale reset; the cap is far above the
            // number of terminologies any one import touches.
            cache.clear();
        }
        cache.insert(terminology_id, Arc::clone(&entry));
        Ok(entry)
    }
}
