//! Server dependencies for domain actions (using traits for testability)
//!
//! Central dependency container handed to every domain action. External
//! time is behind the `BaseClock` trait so tests can drive it.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::clock::{BaseClock, SystemClock};
use crate::kernel::push_hub::PushHub;
use crate::kernel::scheduler::Scheduler;

/// Server dependencies accessible to domain actions.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// In-process connection directory + push transport for SSE endpoints.
    pub push_hub: PushHub,
    /// Wall clock, injectable for tests.
    pub clock: Arc<dyn BaseClock>,
    /// Deferred scheduler for reminders at future instants.
    pub scheduler: Scheduler,
}

impl ServerDeps {
    /// Create ServerDeps with the given clock.
    pub fn new(db_pool: PgPool, push_hub: PushHub, clock: Arc<dyn BaseClock>) -> Self {
        let scheduler = Scheduler::new(Arc::clone(&clock));
        Self {
            db_pool,
            push_hub,
            clock,
            scheduler,
        }
    }

    /// Create ServerDeps on the system clock (production path).
    pub fn with_system_clock(db_pool: PgPool, push_hub: PushHub) -> Self {
        Self::new(db_pool, push_hub, Arc::new(SystemClock))
    }
}
