use super::*;

use std::path::PathBuf;

fn test_config() -> fitment_core::AppConfig {
    fitment_core::AppConfig {
        database_url: String::new(),
        env: fitment_core::Environment::Test,
        log_level: "info".to_string(),
        mappings_path: PathBuf::from("./config/mappings.yaml"),
        db_max_connections: 2,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        persist_warnings: true,
        terminology_cache_cap: 256,
        batch_concurrency: 4,
    }
}

/// Writes an applications file into the OS temp dir and returns its path.
fn write_applications_file(name: &str, lines: &[&str]) -> PathBuf {
    let path =
        std::env::temp_dir().join(format!("fitment-cli-{name}-{}.txt", std::process::id()));
    std::fs::write(&path, lines.join("\n"))
        .unwrap_or_else(|e| panic!("write_applications_file failed for {name}: {e}"));
    path
}

async fn insert_vehicle(pool: &sqlx::PgPool, year: i32, make: &str, model: &str) {
    sqlx::query("INSERT INTO reference_vehicles (year, make, model) VALUES ($1, $2, $3)")
        .bind(year)
        .bind(make)
        .bind(model)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_vehicle failed for {year} {make} {model}: {e}"));
}

async fn insert_terminology(pool: &sqlx::PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO part_terminologies (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_terminology failed for '{name}': {e}"))
}

async fn insert_position(pool: &sqlx::PgPool, terminology_id: i64, name: &str) {
    sqlx::query("INSERT INTO reference_positions (terminology_id, name) VALUES ($1, $2)")
        .bind(terminology_id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_position failed for '{name}': {e}"));
}

/// Seeds the WK Grand Cherokee fixture: catalog years 2005-2010, a
/// ball joint terminology with its positions, and one mapping rule.
/// Returns the terminology id.
async fn seed_wk_fixture(pool: &sqlx::PgPool) -> i64 {
    for year in 2005..=2010 {
        insert_vehicle(pool, year, "Jeep", "Grand Cherokee").await;
    }
    let terminology_id = insert_terminology(pool, "Ball Joint").await;
    for name in [
        "Left Front Upper",
        "Right Front Upper",
        "Left Front Lower",
        "Right Front Lower",
        "N/A",
    ] {
        insert_position(pool, terminology_id, name).await;
    }
    let rule = fitment_core::MappingRule {
        pattern: "WK Grand Cherokee".to_string(),
        make: "Jeep".to_string(),
        vehicle_code: "WK".to_string(),
        model: "Grand Cherokee".to_string(),
        priority: 0,
        active: true,
    };
    fitment_db::create_mapping_rule(pool, &rule)
        .await
        .expect("create mapping rule");
    terminology_id
}

#[sqlx::test(migrations = "../../migrations")]
async fn process_completes_a_run_and_counts_results(pool: sqlx::PgPool) {
    let terminology_id = seed_wk_fixture(&pool).await;
    let file = write_applications_file(
        "complete",
        &[
            "2005-2010 WK Grand Cherokee (Left or Right Front Upper Ball Joint);",
            "",
            "2007 WK Grand Cherokee (Left Front Lower)",
        ],
    );

    run_process(&pool, &test_config(), terminology_id, &file, None, false, false)
        .await
        .expect("process should succeed");

    let runs = fitment_db::list_import_runs(&pool, 10)
        .await
        .expect("list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "succeeded");
    assert_eq!(runs[0].terminology_id, terminology_id);
    // 12 results from the year range entry plus 1 from the single year.
    assert_eq!(runs[0].records_processed, 13);
    assert!(runs[0].started_at.is_some());
    assert!(runs[0].completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn process_with_save_persists_accepted_results(pool: sqlx::PgPool) {
    let terminology_id = seed_wk_fixture(&pool).await;
    let file = write_applications_file(
        "save",
        &["2005-2010 WK Grand Cherokee (Left or Right Front Upper Ball Joint);"],
    );

    run_process(
        &pool,
        &test_config(),
        terminology_id,
        &file,
        Some(77),
        true,
        false,
    )
    .await
    .expect("process with save should succeed");

    let records = fitment_db::list_fitment_records(&pool, 77)
        .await
        .expect("list fitment records");
    assert_eq!(records.len(), 12);
    assert!(records.iter().all(|r| r.status == "VALID"));
    assert!(records.iter().all(|r| r.product_id == 77));
}

#[sqlx::test(migrations = "../../migrations")]
async fn save_without_product_id_is_rejected_up_front(pool: sqlx::PgPool) {
    let terminology_id = seed_wk_fixture(&pool).await;
    let file = write_applications_file("no-product", &["2007 WK Grand Cherokee (Left Front Lower)"]);

    let result = run_process(&pool, &test_config(), terminology_id, &file, None, true, false).await;

    let err = result.expect_err("expected Err when --save lacks --product-id");
    let msg = format!("{err}");
    assert!(
        msg.contains("--product-id"),
        "error should mention the missing flag, got: {msg}"
    );

    let runs = fitment_db::list_import_runs(&pool, 10)
        .await
        .expect("list runs");
    assert!(runs.is_empty(), "rejected invocation must not create a run");
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_terminology_marks_the_run_failed(pool: sqlx::PgPool) {
    seed_wk_fixture(&pool).await;
    let file = write_applications_file("bad-term", &["2007 WK Grand Cherokee (Left Front Lower)"]);

    let result = run_process(&pool, &test_config(), 999, &file, None, false, false).await;
    assert!(result.is_err(), "unknown terminology should propagate");

    let runs = fitment_db::list_import_runs(&pool, 10)
        .await
        .expect("list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "failed");
    let message = runs[0]
        .error_message
        .as_deref()
        .expect("failed run records an error message");
    assert!(
        message.contains("999"),
        "error message should name the terminology id, got: {message}"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn file_with_only_blank_lines_skips_run_creation(pool: sqlx::PgPool) {
    let terminology_id = seed_wk_fixture(&pool).await;
    let file = write_applications_file("blank", &["", "   ", ""]);

    run_process(&pool, &test_config(), terminology_id, &file, None, false, false)
        .await
        .expect("blank file should be a no-op");

    let runs = fitment_db::list_import_runs(&pool, 10)
        .await
        .expect("list runs");
    assert!(runs.is_empty(), "no applications means no run");
}
