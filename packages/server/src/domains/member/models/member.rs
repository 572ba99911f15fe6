use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MemberId, Role};

/// A platform user: ranch staff with a role controlling what they may do.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    pub id: MemberId,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Member {
    pub async fn find_by_id(id: MemberId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Resolve all active members holding any of the given roles.
    ///
    /// This is the recipient-resolution surface used by the notification
    /// dispatcher when broadcasting to roles.
    pub async fn find_active_with_roles(roles: &[Role], pool: &PgPool) -> Result<Vec<Self>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM members
            WHERE role = ANY($1)
              AND active = true
              AND deleted_at IS NULL
            ORDER BY full_name
            "#,
        )
        .bind(&names)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
