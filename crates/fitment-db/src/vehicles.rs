//! Read access to the `reference_vehicles` catalog.
//!
//! The vehicle catalog is maintained by external imports; this module
//! only queries it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fitment_core::ReferenceVehicle;

use crate::DbError;

/// A row from the `reference_vehicles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReferenceVehicleRow {
    pub id: i64,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub submodel: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReferenceVehicleRow {
    #[must_use]
    pub fn into_vehicle(self) -> ReferenceVehicle {
        ReferenceVehicle {
            id: self.id,
            year: self.year,
            make: self.make,
            model: self.model,
            submodel: self.submodel,
        }
    }
}

/// Finds catalog vehicles matching the given filters. All filters are
/// conjunctive; `None` means "any". Make and model compare
/// case-insensitively. Ordered by year, make, model, id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_vehicles(
    pool: &PgPool,
    year: Option<i32>,
    make: Option<&str>,
    model: Option<&str>,
) -> Result<Vec<ReferenceVehicleRow>, DbError> {
    let rows = sqlx::query_as::<_, ReferenceVehicleRow>(
        "SELECT id, year, make, model, submodel, created_at \
         FROM reference_vehicles \
         WHERE ($1::INTEGER IS NULL OR year = $1) \
           AND ($2::TEXT IS NULL OR LOWER(make) = LOWER($2)) \
           AND ($3::TEXT IS NULL OR LOWER(model) = LOWER($3)) \
         ORDER BY year, make, model, id",
    )
    .bind(year)
    .bind(make)
    .bind(model)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
