use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{MemberId, NotificationId};

/// A persisted message addressed to one member.
///
/// The unread/read flag is the member-facing state; `deleted_at` is the
/// separate "clear read notifications" cleanup and hides the row from lists.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub member_id: MemberId,
    pub title: String,
    pub body: String,
    pub severity: String,
    pub category: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Insert one row per recipient in a single bulk statement.
    pub async fn insert_many(
        member_ids: &[MemberId],
        title: &str,
        body: &str,
        severity: &str,
        category: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = member_ids.iter().map(|id| (*id).into()).collect();
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO notifications (member_id, title, body, severity, category)
            SELECT m, $2, $3, $4, $5 FROM UNNEST($1::uuid[]) AS m
            RETURNING *
            "#,
        )
        .bind(&uuids)
        .bind(title)
        .bind(body)
        .bind(severity)
        .bind(category)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn insert(
        member_id: MemberId,
        title: &str,
        body: &str,
        severity: &str,
        category: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO notifications (member_id, title, body, severity, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(member_id)
        .bind(title)
        .bind(body)
        .bind(severity)
        .bind(category)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest first, cleared rows excluded.
    pub async fn list_for_member(member_id: MemberId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM notifications
            WHERE member_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Mark one of the member's notifications read. Returns the updated row,
    /// or `None` when it does not exist or belongs to someone else.
    pub async fn mark_read(
        id: NotificationId,
        member_id: MemberId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE notifications SET read = true
            WHERE id = $1 AND member_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(member_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_all_read(member_id: MemberId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true WHERE member_id = $1 AND read = false AND deleted_at IS NULL",
        )
        .bind(member_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Soft-delete all read notifications for a member ("clear read").
    pub async fn clear_read(member_id: MemberId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET deleted_at = now() WHERE member_id = $1 AND read = true AND deleted_at IS NULL",
        )
        .bind(member_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
