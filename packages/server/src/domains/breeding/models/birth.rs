use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{BirthId, DiagnosisId, EventTypeId};

/// The recorded delivery event closing a positive diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Birth {
    pub id: BirthId,
    pub diagnosis_id: DiagnosisId,
    pub event_type_id: EventTypeId,
    pub note: Option<String>,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Birth {
    pub async fn insert(
        conn: &mut PgConnection,
        diagnosis_id: DiagnosisId,
        event_type_id: EventTypeId,
        note: Option<&str>,
        event_date: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO births (diagnosis_id, event_type_id, note, event_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(diagnosis_id)
        .bind(event_type_id)
        .bind(note)
        .bind(event_date)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_by_id(id: BirthId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM births WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_diagnosis(diagnosis_id: DiagnosisId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM births WHERE diagnosis_id = $1 AND deleted_at IS NULL",
        )
        .bind(diagnosis_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
