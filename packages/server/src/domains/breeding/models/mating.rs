use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{AnimalId, MatingId};
use crate::domains::breeding::gate::{ChainSnapshot, DiagnosisState, LatestMating};

/// A recorded breeding attempt between a female and, optionally, a known male.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mating {
    pub id: MatingId,
    pub female_id: AnimalId,
    pub male_id: Option<AnimalId>,
    /// Position in the female's chain, authoritative for ordering.
    pub sequence_number: i32,
    /// Display tag derived from the sequence number ("MONTA-3").
    pub tag: String,
    pub note: Option<String>,
    /// Flipped true by an explicit completion update.
    pub resolved: bool,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Row shape for the chain-snapshot query.
#[derive(sqlx::FromRow)]
struct ChainRow {
    sequence_number: i32,
    diagnosis_result: Option<bool>,
    has_birth: bool,
}

impl Mating {
    /// Read the female's chain state inside the registration transaction.
    ///
    /// Locks the latest mating row (`FOR UPDATE OF m`) so two concurrent
    /// registrations for the same female serialize; the partial unique index
    /// on `(female_id, sequence_number)` backstops the first-ever race.
    pub async fn chain_snapshot(
        conn: &mut PgConnection,
        female_id: AnimalId,
    ) -> Result<ChainSnapshot, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM matings WHERE female_id = $1 AND deleted_at IS NULL",
        )
        .bind(female_id)
        .fetch_one(&mut *conn)
        .await?;

        let latest = sqlx::query_as::<_, ChainRow>(
            r#"
            SELECT m.sequence_number,
                   d.result AS diagnosis_result,
                   (b.id IS NOT NULL) AS has_birth
            FROM matings m
            LEFT JOIN diagnoses d ON d.mating_id = m.id AND d.deleted_at IS NULL
            LEFT JOIN births b ON b.diagnosis_id = d.id AND b.deleted_at IS NULL
            WHERE m.female_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.sequence_number DESC
            LIMIT 1
            FOR UPDATE OF m
            "#,
        )
        .bind(female_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(ChainSnapshot {
            mating_count: count,
            latest: latest.map(|row| LatestMating {
                sequence: row.sequence_number,
                diagnosis: row.diagnosis_result.map(|positive| DiagnosisState {
                    positive,
                    has_birth: row.has_birth,
                }),
            }),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        conn: &mut PgConnection,
        female_id: AnimalId,
        male_id: Option<AnimalId>,
        sequence_number: i32,
        tag: &str,
        note: Option<&str>,
        resolved: bool,
        event_date: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO matings (female_id, male_id, sequence_number, tag, note, resolved, event_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(female_id)
        .bind(male_id)
        .bind(sequence_number)
        .bind(tag)
        .bind(note)
        .bind(resolved)
        .bind(event_date)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_by_id(id: MatingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM matings WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list_for_female(female_id: AnimalId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM matings
            WHERE female_id = $1 AND deleted_at IS NULL
            ORDER BY sequence_number
            "#,
        )
        .bind(female_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: MatingId,
        note: Option<&str>,
        resolved: bool,
        event_date: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE matings SET note = $2, resolved = $3, event_date = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(note)
        .bind(resolved)
        .bind(event_date)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn soft_delete(id: MatingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE matings SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Whether a live diagnosis is attached to this mating.
    pub async fn has_diagnosis(id: MatingId, pool: &PgPool) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM diagnoses WHERE mating_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
