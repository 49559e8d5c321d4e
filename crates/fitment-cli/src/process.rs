//! Application processing command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. A batch runs inside an import run so progress and
//! failures stay visible in `import_runs`; individual bad application
//! strings become error results rather than aborting the batch.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use fitment_core::ValidationResult;
use fitment_db::PgFitmentStore;
use fitment_engine::{EngineConfig, MappingEngine};

use crate::fail_run_best_effort;

/// Run a file of application strings through the mapping engine.
///
/// Reads one application per line (blank lines skipped), loads the
/// mapping table from the database, and processes the batch inside an
/// import run. Results are printed per line or as a JSON report; with
/// `--save` the accepted results are persisted for `product_id`.
///
/// # Errors
///
/// Returns an error if `--save` is given without `--product-id`, the
/// file cannot be read, the mapping table is empty, the terminology id
/// is unknown, or any database operation fails. The import run is
/// marked failed before such errors propagate.
pub(crate) async fn run_process(
    pool: &sqlx::PgPool,
    config: &fitment_core::AppConfig,
    terminology_id: i64,
    file: &Path,
    product_id: Option<i64>,
    save: bool,
    json: bool,
) -> anyhow::Result<()> {
    if save && product_id.is_none() {
        anyhow::bail!("--save requires --product-id so fitment records have a product to attach to");
    }

    let contents = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read applications file {}: {e}", file.display()))?;
    let applications: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect();

    if applications.is_empty() {
        println!(
            "no applications found in {}; skipping run creation",
            file.display()
        );
        return Ok(());
    }

    let engine_config = EngineConfig {
        persist_warnings: config.persist_warnings,
        terminology_cache_cap: config.terminology_cache_cap,
        batch_concurrency: config.batch_concurrency,
    };
    let engine = MappingEngine::with_config(PgFitmentStore::new(pool.clone()), engine_config);
    let loaded = engine.refresh_mappings().await?;
    tracing::debug!(rules = loaded, "mapping table loaded");

    let run = fitment_db::create_import_run(pool, terminology_id, "cli").await?;
    if let Err(e) = fitment_db::start_import_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, "process", format!("{e:#}")).await;
        return Err(e.into());
    }

    let report = match engine.batch_process(&applications, terminology_id).await {
        Ok(report) => report,
        Err(e) => {
            fail_run_best_effort(pool, run.id, "process", format!("{e:#}")).await;
            return Err(e.into());
        }
    };

    let save_outcome = match (save, product_id) {
        (true, Some(product_id)) => {
            let all: Vec<ValidationResult> =
                report.results.values().flatten().cloned().collect();
            match engine.save_results(product_id, &all).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    fail_run_best_effort(pool, run.id, "process", format!("{e:#}")).await;
                    return Err(e.into());
                }
            }
        }
        _ => None,
    };

    let records_processed =
        i32::try_from(report.counts.valid + report.counts.warning + report.counts.error)
            .unwrap_or(i32::MAX);
    if let Err(err) = fitment_db::complete_import_run(pool, run.id, records_processed).await {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, "process", message).await;
        return Err(err.into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut seen: HashSet<&str> = HashSet::new();
        for application in &applications {
            if !seen.insert(application.as_str()) {
                continue;
            }
            println!("{application}");
            if let Some(results) = report.results.get(application) {
                for result in results {
                    println!("  [{}] {}", result.status, result.message);
                }
            }
            println!();
        }
        println!(
            "{} applications: {} valid, {} warning, {} error",
            report.results.len(),
            report.counts.valid,
            report.counts.warning,
            report.counts.error
        );
        if let Some(outcome) = save_outcome {
            println!(
                "saved {} fitment records ({} warnings skipped, {} rejected)",
                outcome.written,
                outcome.skipped_warnings,
                outcome.rejected.len()
            );
        }
    }

    Ok(())
}

/// Show recent import runs, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_runs(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = fitment_db::list_import_runs(pool, limit).await?;

    if runs.is_empty() {
        println!("no import runs found; run `process` first");
        return Ok(());
    }

    let header = format!(
        "{:<6}{:<14}{:<12}{:<22}{:<9}ERROR",
        "ID", "TERMINOLOGY", "STATUS", "STARTED", "RECORDS"
    );
    println!("{header}");
    for run in &runs {
        let started = fmt_time(run.started_at);
        let error_display = run.error_message.as_deref().unwrap_or("\u{2014}");
        println!(
            "{:<6}{:<14}{:<12}{:<22}{:<9}{}",
            run.id, run.terminology_id, run.status, started, run.records_processed, error_display
        );
    }

    Ok(())
}

/// Format an optional timestamp for display, returning `"—"` when `None`.
fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "process_test.rs"]
mod tests;
