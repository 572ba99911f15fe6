use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::EventTypeId;

/// Reference data: the kind of delivery event a birth records
/// (normal calving, assisted, caesarean, ...).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventType {
    pub id: EventTypeId,
    pub name: String,
    pub category: String,
}

impl EventType {
    pub async fn find_by_id(id: EventTypeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM event_types WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
