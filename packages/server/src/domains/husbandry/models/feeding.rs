use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{AnimalId, FeedingId, StockItemId};

/// A feed ration given to an animal, drawn from the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feeding {
    pub id: FeedingId,
    pub animal_id: AnimalId,
    pub stock_item_id: StockItemId,
    pub quantity: i32,
    pub note: Option<String>,
    pub fed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Feeding {
    pub async fn insert(
        conn: &mut PgConnection,
        animal_id: AnimalId,
        stock_item_id: StockItemId,
        quantity: i32,
        note: Option<&str>,
        fed_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO feedings (animal_id, stock_item_id, quantity, note, fed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(animal_id)
        .bind(stock_item_id)
        .bind(quantity)
        .bind(note)
        .bind(fed_at)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_by_id(id: FeedingId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM feedings WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn soft_delete(conn: &mut PgConnection, id: FeedingId) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE feedings SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }
}
