//! Mapping-rule configuration loaded from YAML.
//!
//! The seed file (`config/mappings.yaml`) is the source of truth for
//! the free-text-to-vehicle mapping rules. Each entry pairs a substring
//! `pattern` with a `mapping` of the form `Make|VehicleCode|Model`.
//! Loading validates the whole file up front so a malformed entry is
//! caught at startup rather than mid-import.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fitment::MappingRule;
use crate::ConfigError;

/// Separator between the make, vehicle code, and model fields of a
/// mapping target.
pub const MAPPING_FIELD_SEPARATOR: char = '|';

/// One configured mapping rule as it appears in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Case-insensitive substring to look for in vehicle text.
    pub pattern: String,
    /// Target vehicle as `Make|VehicleCode|Model`.
    pub mapping: String,
    /// Higher priority wins when several patterns match.
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl MappingConfig {
    /// Splits the `mapping` field into its three parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the field does not
    /// contain exactly two separators or any part is empty.
    pub fn split_mapping(&self) -> Result<(String, String, String), ConfigError> {
        let parts: Vec<&str> = self.mapping.split(MAPPING_FIELD_SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(ConfigError::Validation(format!(
                "mapping '{}' must have the form Make{sep}VehicleCode{sep}Model",
                self.mapping,
                sep = MAPPING_FIELD_SEPARATOR,
            )));
        }
        let make = parts[0].trim();
        let vehicle_code = parts[1].trim();
        let model = parts[2].trim();
        if make.is_empty() || vehicle_code.is_empty() || model.is_empty() {
            return Err(ConfigError::Validation(format!(
                "mapping '{}' has an empty make, vehicle code, or model",
                self.mapping,
            )));
        }
        Ok((
            make.to_string(),
            vehicle_code.to_string(),
            model.to_string(),
        ))
    }

    /// Converts the config entry into an engine [`MappingRule`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the mapping target is
    /// malformed.
    pub fn to_rule(&self) -> Result<MappingRule, ConfigError> {
        let (make, vehicle_code, model) = self.split_mapping()?;
        Ok(MappingRule {
            pattern: self.pattern.clone(),
            make,
            vehicle_code,
            model,
            priority: self.priority,
            active: self.active,
        })
    }
}

/// Top-level shape of the mappings YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingsFile {
    pub mappings: Vec<MappingConfig>,
}

/// Loads and validates the mappings file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::MappingsFileIo`] when the file cannot be
/// read, [`ConfigError::MappingsFileParse`] when it is not valid YAML,
/// and [`ConfigError::Validation`] when an entry is malformed.
pub fn load_mappings(path: &Path) -> Result<MappingsFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::MappingsFileIo {
        path: path.display().to_string(),
        source,
    })?;
    let file: MappingsFile = serde_yaml::from_str(&contents)?;
    validate_mappings(&file)?;
    Ok(file)
}

/// Validates every entry of a parsed mappings file.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] for empty patterns, malformed
/// mapping targets, or duplicate (pattern, mapping) pairs.
pub fn validate_mappings(file: &MappingsFile) -> Result<(), ConfigError> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    for config in &file.mappings {
        if config.pattern.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "mapping '{}' has an empty pattern",
                config.mapping,
            )));
        }
        config.split_mapping()?;
        let key = (
            config.pattern.trim().to_ascii_lowercase(),
            config.mapping.clone(),
        );
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate mapping entry for pattern '{}' -> '{}'",
                config.pattern, config.mapping,
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(pattern: &str, mapping: &str) -> MappingConfig {
        MappingConfig {
            pattern: pattern.to_string(),
            mapping: mapping.to_string(),
            priority: 0,
            active: true,
        }
    }

    #[test]
    fn split_mapping_accepts_three_fields() {
        let cfg = config("WK Grand Cherokee", "Jeep|WK|Grand Cherokee");
        let (make, code, model) = cfg.split_mapping().expect("valid mapping");
        assert_eq!(make, "Jeep");
        assert_eq!(code, "WK");
        assert_eq!(model, "Grand Cherokee");
    }

    #[test]
    fn split_mapping_trims_field_whitespace() {
        let cfg = config("ram 1500", " Dodge | DS | Ram 1500 ");
        let (make, code, model) = cfg.split_mapping().expect("valid mapping");
        assert_eq!(make, "Dodge");
        assert_eq!(code, "DS");
        assert_eq!(model, "Ram 1500");
    }

    #[test]
    fn split_mapping_rejects_wrong_separator_count() {
        assert!(config("x", "Jeep|WK").split_mapping().is_err());
        assert!(config("x", "Jeep|WK|Grand|Cherokee").split_mapping().is_err());
        assert!(config("x", "Jeep WK Grand Cherokee").split_mapping().is_err());
    }

    #[test]
    fn split_mapping_rejects_empty_fields() {
        assert!(config("x", "|WK|Grand Cherokee").split_mapping().is_err());
        assert!(config("x", "Jeep||Grand Cherokee").split_mapping().is_err());
        assert!(config("x", "Jeep|WK|  ").split_mapping().is_err());
    }

    #[test]
    fn to_rule_carries_priority_and_active() {
        let mut cfg = config("durango", "Dodge|DN|Durango");
        cfg.priority = 7;
        cfg.active = false;
        let rule = cfg.to_rule().expect("valid rule");
        assert_eq!(rule.pattern, "durango");
        assert_eq!(rule.make, "Dodge");
        assert_eq!(rule.priority, 7);
        assert!(!rule.active);
    }

    #[test]
    fn validate_rejects_empty_pattern() {
        let file = MappingsFile {
            mappings: vec![config("   ", "Jeep|WK|Grand Cherokee")],
        };
        assert!(validate_mappings(&file).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_entries() {
        let file = MappingsFile {
            mappings: vec![
                config("wk grand cherokee", "Jeep|WK|Grand Cherokee"),
                config("WK Grand Cherokee", "Jeep|WK|Grand Cherokee"),
            ],
        };
        assert!(validate_mappings(&file).is_err());
    }

    #[test]
    fn yaml_defaults_apply() {
        let yaml = "mappings:\n  - pattern: \"WK Grand Cherokee\"\n    mapping: \"Jeep|WK|Grand Cherokee\"\n";
        let file: MappingsFile = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(file.mappings.len(), 1);
        assert_eq!(file.mappings[0].priority, 0);
        assert!(file.mappings[0].active);
    }

    #[test]
    fn loads_the_checked_in_mappings_file() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/mappings.yaml");
        let file = load_mappings(&path).expect("checked-in mappings file loads");
        assert!(!file.mappings.is_empty());
        for config in &file.mappings {
            config.split_mapping().expect("every entry splits");
        }
    }
}
