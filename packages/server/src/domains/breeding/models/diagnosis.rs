use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{DiagnosisId, MatingId};

/// The pregnancy-test outcome for exactly one mating.
///
/// Invariant: a positive result always carries a predicted birth date, a
/// negative one never does. Enforced by the actions layer and a table check
/// constraint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Diagnosis {
    pub id: DiagnosisId,
    pub mating_id: MatingId,
    /// Test method ("palpation", "ultrasound", ...).
    pub method: String,
    pub result: bool,
    pub predicted_birth_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Diagnosis {
    pub async fn insert(
        conn: &mut PgConnection,
        mating_id: MatingId,
        method: &str,
        result: bool,
        predicted_birth_date: Option<DateTime<Utc>>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO diagnoses (mating_id, method, result, predicted_birth_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(mating_id)
        .bind(method)
        .bind(result)
        .bind(predicted_birth_date)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_by_id(id: DiagnosisId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM diagnoses WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_mating(mating_id: MatingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM diagnoses WHERE mating_id = $1 AND deleted_at IS NULL",
        )
        .bind(mating_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: DiagnosisId,
        method: &str,
        result: bool,
        predicted_birth_date: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE diagnoses SET method = $2, result = $3, predicted_birth_date = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(method)
        .bind(result)
        .bind(predicted_birth_date)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn soft_delete(id: DiagnosisId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE diagnoses SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Whether a live birth is attached to this diagnosis.
    pub async fn has_birth(id: DiagnosisId, pool: &PgPool) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM births WHERE diagnosis_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
