//! Injectable wall clock.
//!
//! The deferred scheduler and the breeding date rules read time through
//! `BaseClock` so tests can substitute a controlled clock.

use chrono::{DateTime, Utc};

/// Wall-clock abstraction.
///
/// Naming convention: Base* for infrastructure trait names.
pub trait BaseClock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl BaseClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
