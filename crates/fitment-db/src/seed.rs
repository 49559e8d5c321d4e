//! Seeding mapping rules from the YAML config into the database.

use sqlx::PgPool;

use fitment_core::MappingConfig;

use crate::DbError;

/// Upserts mapping rules from config into the `mapping_rules` table.
///
/// Returns the number of rules processed (inserted or updated). All
/// upserts run inside a single transaction; if any operation fails the
/// entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::InvalidConfig`] when an entry's mapping target is
/// malformed, or [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_mapping_rules(
    pool: &PgPool,
    configs: &[MappingConfig],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for config in configs {
        let (make, vehicle_code, model) = config
            .split_mapping()
            .map_err(|e| DbError::InvalidConfig(e.to_string()))?;

        sqlx::query(
            "INSERT INTO mapping_rules (pattern, make, vehicle_code, model, priority, active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (pattern, make, vehicle_code, model) DO UPDATE SET \
                 priority = EXCLUDED.priority, \
                 active = EXCLUDED.active, \
                 updated_at = NOW()",
        )
        .bind(&config.pattern)
        .bind(&make)
        .bind(&vehicle_code)
        .bind(&model)
        .bind(config.priority)
        .bind(config.active)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use fitment_core::MappingConfig;

    #[test]
    fn malformed_mapping_is_reported_by_split() {
        // The seed path surfaces split failures as InvalidConfig; the
        // split logic itself is tested in fitment-core.
        let config = MappingConfig {
            pattern: "wk".to_string(),
            mapping: "Jeep|WK".to_string(),
            priority: 0,
            active: true,
        };
        assert!(config.split_mapping().is_err());
    }
}
