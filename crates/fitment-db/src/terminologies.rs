//! Read access to the `part_terminologies` and `reference_positions`
//! catalogs.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fitment_core::{PartTerminology, ReferencePosition};

use crate::DbError;

/// A row from the `part_terminologies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PartTerminologyRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl PartTerminologyRow {
    #[must_use]
    pub fn into_terminology(self) -> PartTerminology {
        PartTerminology {
            id: self.id,
            name: self.name,
        }
    }
}

/// A row from the `reference_positions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReferencePositionRow {
    pub id: i64,
    pub terminology_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ReferencePositionRow {
    #[must_use]
    pub fn into_position(self) -> ReferencePosition {
        ReferencePosition {
            id: self.id,
            name: self.name,
        }
    }
}

/// Fetches one part terminology by id, or `None` when the catalog has
/// no such row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_terminology(
    pool: &PgPool,
    id: i64,
) -> Result<Option<PartTerminologyRow>, DbError> {
    let row = sqlx::query_as::<_, PartTerminologyRow>(
        "SELECT id, name, created_at FROM part_terminologies WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the positions valid for a part terminology, in catalog
/// order. An unknown terminology simply has no positions.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_positions_for_terminology(
    pool: &PgPool,
    terminology_id: i64,
) -> Result<Vec<ReferencePositionRow>, DbError> {
    let rows = sqlx::query_as::<_, ReferencePositionRow>(
        "SELECT id, terminology_id, name, created_at \
         FROM reference_positions \
         WHERE terminology_id = $1 \
         ORDER BY id",
    )
    .bind(terminology_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
