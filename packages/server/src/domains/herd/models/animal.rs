use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::AnimalId;

/// Animal sex, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// An animal in the herd. The full animal registry (breeds, paddocks,
/// purchases) lives in its own surface; the breeding workflow only needs
/// identity and sex.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Animal {
    pub id: AnimalId,
    /// Ear-tag or registry code.
    pub tag: String,
    pub sex: Sex,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Animal {
    pub async fn find_by_id(id: AnimalId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM animals WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
