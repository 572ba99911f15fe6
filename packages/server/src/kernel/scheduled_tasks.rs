//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Two periodic jobs run alongside the per-event timers armed by the
//! breeding workflow:
//! - hourly push-hub housekeeping (drop channels nobody listens to)
//! - a daily stock review that alerts on items sitting near the reserve
//!
//! Jobs stay thin: they read state and hand off to the dispatcher rather
//! than doing domain work inline.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::notifications::dispatcher::Dispatcher;
use crate::domains::stock::alerts::{low_stock_message, LOW_STOCK_ROLES};
use crate::domains::stock::ledger::{LOW_STOCK_MARGIN, MINIMUM_RESERVE};
use crate::domains::stock::models::stock_item::StockItem;
use crate::kernel::clock::SystemClock;
use crate::kernel::push_hub::PushHub;

/// Start all scheduled tasks
pub async fn start_scheduler(pool: PgPool, hub: PushHub) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Hub housekeeping - runs every hour
    let cleanup_hub = hub.clone();
    let cleanup_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let hub = cleanup_hub.clone();
        Box::pin(async move {
            hub.cleanup().await;
            tracing::debug!("Push hub housekeeping complete");
        })
    })?;

    scheduler.add(cleanup_job).await?;

    // Daily stock review - runs at 07:00 UTC, ahead of the morning reminders
    let review_pool = pool.clone();
    let review_hub = hub.clone();
    let review_job = Job::new_async("0 0 7 * * *", move |_uuid, _lock| {
        let pool = review_pool.clone();
        let hub = review_hub.clone();
        Box::pin(async move {
            if let Err(e) = run_stock_review(&pool, &hub).await {
                tracing::error!("Daily stock review failed: {}", e);
            }
        })
    })?;

    scheduler.add(review_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (hub cleanup hourly, stock review daily at 07:00 UTC)");
    Ok(scheduler)
}

/// Run the daily stock review
///
/// Notifies stock-handling roles about every item whose quantity is at or
/// below the reserve plus the warning margin.
async fn run_stock_review(pool: &PgPool, hub: &PushHub) -> Result<()> {
    tracing::info!("Running daily stock review");

    let items = StockItem::find_at_or_below(MINIMUM_RESERVE + LOW_STOCK_MARGIN, pool).await?;

    if items.is_empty() {
        tracing::info!("Stock review: all items above the warning level");
        return Ok(());
    }

    let dispatcher = Dispatcher::new(pool.clone(), hub.clone(), Arc::new(SystemClock));
    for item in &items {
        let (title, body) = low_stock_message(item);
        dispatcher
            .broadcast_to_roles(&title, &body, "warning", "stock", LOW_STOCK_ROLES)
            .await;
    }

    tracing::info!("Stock review complete: {} items flagged", items.len());
    Ok(())
}
