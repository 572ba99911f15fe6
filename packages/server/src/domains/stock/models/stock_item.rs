use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::StockItemId;

/// A consumable inventory resource (feed sacks, vaccine doses, ...).
///
/// Quantities are whole units; the protected minimum reserve is a global
/// constant, see the ledger module.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockItem {
    pub id: StockItemId,
    pub name: String,
    /// Unit label for display ("kg", "dose", "sack").
    pub unit: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StockItem {
    pub async fn find_by_id(id: StockItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM stock_items WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Items at or below the given quantity (daily low-stock review).
    pub async fn find_at_or_below(level: i32, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM stock_items
            WHERE quantity <= $1 AND deleted_at IS NULL
            ORDER BY quantity ASC, name
            "#,
        )
        .bind(level)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
