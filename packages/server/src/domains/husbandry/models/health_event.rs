use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{AnimalId, HealthEventId, StockItemId};

/// A veterinary intervention on an animal, optionally consuming supplies.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HealthEvent {
    pub id: HealthEventId,
    pub animal_id: AnimalId,
    pub description: String,
    pub performed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// One consumable drawn from stock for a health event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HealthEventConsumable {
    pub health_event_id: HealthEventId,
    pub stock_item_id: StockItemId,
    pub quantity: i32,
}

impl HealthEvent {
    pub async fn insert(
        conn: &mut PgConnection,
        animal_id: AnimalId,
        description: &str,
        performed_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO health_events (animal_id, description, performed_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(animal_id)
        .bind(description)
        .bind(performed_at)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_by_id(id: HealthEventId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM health_events WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: HealthEventId,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE health_events SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }
}

impl HealthEventConsumable {
    pub async fn insert(
        conn: &mut PgConnection,
        health_event_id: HealthEventId,
        stock_item_id: StockItemId,
        quantity: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO health_event_consumables (health_event_id, stock_item_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(health_event_id)
        .bind(stock_item_id)
        .bind(quantity)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn find_for_event(
        conn: &mut PgConnection,
        health_event_id: HealthEventId,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM health_event_consumables WHERE health_event_id = $1",
        )
        .bind(health_event_id)
        .fetch_all(&mut *conn)
        .await
    }
}
