//! Database operations for the `fitment_records` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fitment_core::ValidationResult;

use crate::DbError;

/// A row from the `fitment_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FitmentRecordRow {
    pub id: i64,
    pub public_id: Uuid,
    pub product_id: i64,
    pub terminology_id: i64,
    pub year: i32,
    pub make: String,
    pub vehicle_code: String,
    pub model: String,
    /// Canonical position label, e.g. `Left Front Upper` or `N/A`.
    pub position: String,
    pub status: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writes validated results for a product inside one transaction.
///
/// Each result carrying a fitment becomes one upsert keyed on
/// (product, terminology, year, make, model, position); re-imports
/// update status, message, and vehicle code in place. Results without
/// a fitment are skipped. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction
/// rolls back and nothing is written.
pub async fn insert_fitment_records(
    pool: &PgPool,
    product_id: i64,
    results: &[ValidationResult],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for result in results {
        let Some(fitment) = &result.fitment else {
            continue;
        };
        sqlx::query(
            "INSERT INTO fitment_records \
                 (public_id, product_id, terminology_id, year, make, vehicle_code, \
                  model, position, status, message) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (product_id, terminology_id, year, make, model, position) \
             DO UPDATE SET \
                 vehicle_code = EXCLUDED.vehicle_code, \
                 status = EXCLUDED.status, \
                 message = EXCLUDED.message, \
                 updated_at = NOW()",
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(fitment.terminology_id)
        .bind(fitment.year)
        .bind(&fitment.make)
        .bind(&fitment.vehicle_code)
        .bind(&fitment.model)
        .bind(fitment.position.label())
        .bind(result.status.as_str())
        .bind(&result.message)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}

/// Returns all fitment records for a product, in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_fitment_records(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<FitmentRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, FitmentRecordRow>(
        "SELECT id, public_id, product_id, terminology_id, year, make, vehicle_code, \
                model, position, status, message, created_at, updated_at \
         FROM fitment_records \
         WHERE product_id = $1 \
         ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
