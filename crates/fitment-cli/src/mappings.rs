//! Mapping-rule command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. Seeding validates the whole YAML file before touching
//! the database so a malformed entry never leaves a half-applied table.

use std::path::Path;

use clap::Subcommand;

/// Sub-commands available under `mappings`.
#[derive(Debug, Subcommand)]
pub enum MappingsCommands {
    /// Print the mapping-rule table in match-priority order
    List,
}

/// Seed mapping rules from a YAML file into the `mapping_rules` table.
///
/// Loads and validates the file at `file` (falling back to the
/// configured `mappings_path`), then upserts every entry inside a
/// single transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails validation, or
/// the database upsert fails.
pub(crate) async fn run_mappings_seed(
    pool: &sqlx::PgPool,
    config: &fitment_core::AppConfig,
    file: Option<&Path>,
) -> anyhow::Result<()> {
    let path = file.unwrap_or(config.mappings_path.as_path());
    let mappings_file = fitment_core::load_mappings(path)?;
    let count = fitment_db::seed_mapping_rules(pool, &mappings_file.mappings).await?;
    println!("seeded {count} mapping rules from {}", path.display());
    Ok(())
}

/// Print the mapping-rule table, highest priority first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_mappings_list(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let rules = fitment_db::list_mapping_rules(pool).await?;

    if rules.is_empty() {
        println!("no mapping rules found; run `seed` first");
        return Ok(());
    }

    let header = format!(
        "{:<6}{:<10}{:<8}{:<28}{:<10}{:<8}MODEL",
        "ID", "PRIORITY", "ACTIVE", "PATTERN", "MAKE", "CODE"
    );
    println!("{header}");
    for rule in &rules {
        let pattern_display = if rule.pattern.chars().count() > 26 {
            format!("{}...", rule.pattern.chars().take(23).collect::<String>())
        } else {
            rule.pattern.clone()
        };
        println!(
            "{:<6}{:<10}{:<8}{:<28}{:<10}{:<8}{}",
            rule.id, rule.priority, rule.active, pattern_display, rule.make, rule.vehicle_code,
            rule.model
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "mappings_test.rs"]
mod tests;
