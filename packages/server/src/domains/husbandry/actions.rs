//! Feeding and health-event operations: every stock mutation commits
//! atomically with its consuming record, and reversals restore what the
//! deleted record consumed. Low-stock alerts run as post-commit hooks.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{AnimalId, FeedingId, HealthEventId, StockItemId};
use crate::domains::herd::Animal;
use crate::domains::husbandry::error::HusbandryError;
use crate::domains::husbandry::models::feeding::Feeding;
use crate::domains::husbandry::models::health_event::{HealthEvent, HealthEventConsumable};
use crate::domains::notifications::Dispatcher;
use crate::domains::stock::models::stock_item::StockItem;
use crate::domains::stock::{ledger, low_stock_message, LOW_STOCK_ROLES};
use crate::kernel::{PostCommit, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct RecordFeeding {
    pub animal_id: AnimalId,
    pub stock_item_id: StockItemId,
    pub quantity: i32,
    pub fed_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumableUse {
    pub stock_item_id: StockItemId,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordHealthEvent {
    pub animal_id: AnimalId,
    pub description: String,
    pub performed_at: DateTime<Utc>,
    #[serde(default)]
    pub consumables: Vec<ConsumableUse>,
}

fn low_stock_hook(hooks: &mut PostCommit, deps: &ServerDeps, item: &StockItem) {
    let dispatcher = Dispatcher::new(deps.db_pool.clone(), deps.push_hub.clone(), deps.clock.clone());
    let (title, body) = low_stock_message(item);
    hooks.push(async move {
        dispatcher
            .broadcast_to_roles(&title, &body, "warning", "stock", LOW_STOCK_ROLES)
            .await;
    });
}

/// Record a feeding, withdrawing the ration from stock in the same
/// transaction.
pub async fn record_feeding(
    input: RecordFeeding,
    deps: &ServerDeps,
) -> Result<Feeding, HusbandryError> {
    Animal::find_by_id(input.animal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("animal", input.animal_id.into_uuid()))?;

    let mut tx = deps.db_pool.begin().await?;

    let (item, outcome) = ledger::withdraw(&mut tx, input.stock_item_id, input.quantity).await?;
    let feeding = Feeding::insert(
        &mut tx,
        input.animal_id,
        input.stock_item_id,
        input.quantity,
        input.note.as_deref(),
        input.fed_at,
    )
    .await?;

    tx.commit().await?;

    let mut hooks = PostCommit::new();
    if outcome.low_stock {
        low_stock_hook(&mut hooks, deps, &item);
    }
    hooks.run().await;

    Ok(feeding)
}

/// Delete a feeding and return its ration to stock.
pub async fn delete_feeding(id: FeedingId, deps: &ServerDeps) -> Result<Feeding, HusbandryError> {
    let feeding = Feeding::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("feeding", id.into_uuid()))?;

    let mut tx = deps.db_pool.begin().await?;

    let deleted = Feeding::soft_delete(&mut tx, id)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("feeding", id.into_uuid()))?;
    ledger::restore(&mut tx, feeding.stock_item_id, feeding.quantity).await?;

    tx.commit().await?;

    Ok(deleted)
}

/// Record a health event, withdrawing each listed consumable in the same
/// transaction.
pub async fn record_health_event(
    input: RecordHealthEvent,
    deps: &ServerDeps,
) -> Result<HealthEvent, HusbandryError> {
    Animal::find_by_id(input.animal_id, &deps.db_pool)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("animal", input.animal_id.into_uuid()))?;
    if input.description.trim().is_empty() {
        return Err(HusbandryError::Validation("description is required".into()));
    }

    let mut tx = deps.db_pool.begin().await?;

    let event = HealthEvent::insert(
        &mut tx,
        input.animal_id,
        &input.description,
        input.performed_at,
    )
    .await?;

    let mut low_stock_items = Vec::new();
    for consumable in &input.consumables {
        let (item, outcome) =
            ledger::withdraw(&mut tx, consumable.stock_item_id, consumable.quantity).await?;
        HealthEventConsumable::insert(
            &mut tx,
            event.id,
            consumable.stock_item_id,
            consumable.quantity,
        )
        .await?;
        if outcome.low_stock {
            low_stock_items.push(item);
        }
    }

    tx.commit().await?;

    let mut hooks = PostCommit::new();
    for item in &low_stock_items {
        low_stock_hook(&mut hooks, deps, item);
    }
    hooks.run().await;

    Ok(event)
}

/// Delete a health event, returning every consumable it drew from stock.
pub async fn delete_health_event(
    id: HealthEventId,
    deps: &ServerDeps,
) -> Result<HealthEvent, HusbandryError> {
    HealthEvent::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("health event", id.into_uuid()))?;

    let mut tx = deps.db_pool.begin().await?;

    let deleted = HealthEvent::soft_delete(&mut tx, id)
        .await?
        .ok_or_else(|| HusbandryError::NotFound("health event", id.into_uuid()))?;

    let consumables = HealthEventConsumable::find_for_event(&mut tx, id).await?;
    for consumable in consumables {
        ledger::restore(&mut tx, consumable.stock_item_id, consumable.quantity).await?;
    }

    tx.commit().await?;

    Ok(deleted)
}
