//! Fitment application processing engine.
//!
//! Turns free-text fitment applications like
//! `"2005-2010 WK Grand Cherokee (Left or Right Front Upper Ball Joint);"`
//! into validated, per-year vehicle fitments. The pipeline is
//! parse -> expand -> match -> assemble -> validate, orchestrated by
//! [`MappingEngine`] over a [`FitmentStore`] collaborator.

pub mod assemble;
pub mod engine;
pub mod error;
pub mod expand;
pub mod mapping;
pub mod parse;
pub mod store;
pub mod validate;

pub use engine::{BatchCounts, BatchReport, EngineConfig, MappingEngine, SaveOutcome};
pub use error::{CatalogError, EngineError, ParseError};
pub use mapping::MappingTable;
pub use store::{FitmentStore, MemoryStore};
