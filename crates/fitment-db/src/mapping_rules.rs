//! Database operations for the `mapping_rules` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fitment_core::MappingRule;

use crate::DbError;

/// A row from the `mapping_rules` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MappingRuleRow {
    pub id: i64,
    pub pattern: String,
    pub make: String,
    pub vehicle_code: String,
    pub model: String,
    pub priority: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MappingRuleRow {
    /// Strips persistence bookkeeping, leaving the engine rule.
    #[must_use]
    pub fn into_rule(self) -> MappingRule {
        MappingRule {
            pattern: self.pattern,
            make: self.make,
            vehicle_code: self.vehicle_code,
            model: self.model,
            priority: self.priority,
            active: self.active,
        }
    }
}

/// Returns every mapping rule, active or not, for inspection. Ordered
/// by priority descending, then id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_mapping_rules(pool: &PgPool) -> Result<Vec<MappingRuleRow>, DbError> {
    let rows = sqlx::query_as::<_, MappingRuleRow>(
        "SELECT id, pattern, make, vehicle_code, model, priority, active, \
                created_at, updated_at \
         FROM mapping_rules \
         ORDER BY priority DESC, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the active rules in table order (`id` ascending). This is
/// the load order the engine uses, and it is what makes equal-priority
/// equal-length ties resolve the same way on every run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_mapping_rules(pool: &PgPool) -> Result<Vec<MappingRuleRow>, DbError> {
    let rows = sqlx::query_as::<_, MappingRuleRow>(
        "SELECT id, pattern, make, vehicle_code, model, priority, active, \
                created_at, updated_at \
         FROM mapping_rules \
         WHERE active \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches one rule by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`,
/// or [`DbError::Sqlx`] if the query fails.
pub async fn get_mapping_rule(pool: &PgPool, id: i64) -> Result<MappingRuleRow, DbError> {
    let row = sqlx::query_as::<_, MappingRuleRow>(
        "SELECT id, pattern, make, vehicle_code, model, priority, active, \
                created_at, updated_at \
         FROM mapping_rules \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Inserts a new mapping rule and returns the created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including unique
/// violations on the (pattern, make, vehicle code, model) key).
pub async fn create_mapping_rule(
    pool: &PgPool,
    rule: &MappingRule,
) -> Result<MappingRuleRow, DbError> {
    let row = sqlx::query_as::<_, MappingRuleRow>(
        "INSERT INTO mapping_rules (pattern, make, vehicle_code, model, priority, active) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, pattern, make, vehicle_code, model, priority, active, \
                   created_at, updated_at",
    )
    .bind(&rule.pattern)
    .bind(&rule.make)
    .bind(&rule.vehicle_code)
    .bind(&rule.model)
    .bind(rule.priority)
    .bind(rule.active)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Partially updates a rule. `None` fields keep their current value.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn update_mapping_rule(
    pool: &PgPool,
    id: i64,
    pattern: Option<&str>,
    priority: Option<i32>,
    active: Option<bool>,
) -> Result<MappingRuleRow, DbError> {
    let row = sqlx::query_as::<_, MappingRuleRow>(
        "UPDATE mapping_rules SET \
             pattern = COALESCE($2, pattern), \
             priority = COALESCE($3, priority), \
             active = COALESCE($4, active), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, pattern, make, vehicle_code, model, priority, active, \
                   created_at, updated_at",
    )
    .bind(id)
    .bind(pattern)
    .bind(priority)
    .bind(active)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Deletes a rule. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_mapping_rule(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM mapping_rules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
