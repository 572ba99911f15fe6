//! Deferred task scheduler for arbitrary future instants.
//!
//! A single timer can only express delays up to `MAX_TIMER_DELAY` (a signed
//! 32-bit millisecond count, about 24.8 days). Reminders near a predicted
//! birth date routinely sit farther out than that, so a wait is split into a
//! chain of maximum-length timers, each link re-checking the remaining time
//! against the *original* target before arming the next.
//!
//! Armed tasks are in-memory only: a process restart loses pending reminders.
//! That is an accepted degradation - the firing callback re-validates persisted
//! state anyway, so a stale chain link can never produce a stale alert.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::kernel::clock::BaseClock;

/// Longest delay a single timer link is armed for (i32::MAX milliseconds).
pub const MAX_TIMER_DELAY: Duration = Duration::from_millis(i32::MAX as u64);

/// Compute the next timer delay for a target instant.
///
/// `None` means the target has been reached (or passed) and the task should
/// fire now; `Some(d)` means arm a timer for `d` and re-check afterwards.
fn next_delay(now: DateTime<Utc>, target: DateTime<Utc>) -> Option<Duration> {
    let remaining = (target - now).to_std().ok()?;
    if remaining.is_zero() {
        return None;
    }
    Some(remaining.min(MAX_TIMER_DELAY))
}

/// Fires callbacks at arbitrary future wall-clock instants.
///
/// Cloneable; the clock is shared. Chain links are cancellation-unaware:
/// once armed, a task runs to its fire instant. Cancellation is approximated
/// by the fire-time state re-check performed by the callback itself.
#[derive(Clone)]
pub struct Scheduler {
    clock: Arc<dyn BaseClock>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn BaseClock>) -> Self {
        Self { clock }
    }

    /// The clock this scheduler reads.
    pub fn clock(&self) -> Arc<dyn BaseClock> {
        Arc::clone(&self.clock)
    }

    /// Arm `task` to run at `target`.
    ///
    /// A target in the past fires on the next scheduler tick (zero-delay
    /// path). `label` is only used for logging.
    pub fn schedule_at<F, Fut>(
        &self,
        target: DateTime<Utc>,
        label: impl Into<String>,
        task: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let clock = Arc::clone(&self.clock);
        let label = label.into();
        tracing::debug!(%label, %target, "arming deferred task");

        tokio::spawn(async move {
            while let Some(delay) = next_delay(clock.now(), target) {
                tokio::time::sleep(delay).await;
            }
            tracing::debug!(%label, %target, "deferred task firing");
            task().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Test clock that tracks tokio's (paused) timer.
    struct PausedClock {
        origin: DateTime<Utc>,
        started: tokio::time::Instant,
    }

    impl PausedClock {
        fn new(origin: DateTime<Utc>) -> Self {
            Self {
                origin,
                started: tokio::time::Instant::now(),
            }
        }
    }

    impl BaseClock for PausedClock {
        fn now(&self) -> DateTime<Utc> {
            self.origin + ChronoDuration::from_std(self.started.elapsed()).unwrap()
        }
    }

    fn origin() -> DateTime<Utc> {
        "2025-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_next_delay_past_target_fires_now() {
        let now = origin();
        assert_eq!(next_delay(now, now - ChronoDuration::hours(1)), None);
        assert_eq!(next_delay(now, now), None);
    }

    #[test]
    fn test_next_delay_short_target_single_timer() {
        let now = origin();
        let d = next_delay(now, now + ChronoDuration::seconds(30)).unwrap();
        assert_eq!(d, Duration::from_secs(30));
    }

    #[test]
    fn test_next_delay_distant_target_clamps_to_max() {
        let now = origin();
        let d = next_delay(now, now + ChronoDuration::days(60)).unwrap();
        assert_eq!(d, MAX_TIMER_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_target_fires_immediately() {
        let clock = Arc::new(PausedClock::new(origin()));
        let scheduler = Scheduler::new(clock.clone());
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = scheduler.schedule_at(origin() - ChronoDuration::days(1), "past", move || {
            let flag = flag.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
            }
        });

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
        // No time needed to pass
        assert!(clock.now() - origin() < ChronoDuration::seconds(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_target_fires_at_instant() {
        let clock = Arc::new(PausedClock::new(origin()));
        let scheduler = Scheduler::new(clock.clone());
        let target = origin() + ChronoDuration::hours(6);
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = scheduler.schedule_at(target, "short", move || {
            let flag = flag.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
            }
        });

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
        let overshoot = clock.now() - target;
        assert!(overshoot >= ChronoDuration::zero());
        assert!(overshoot < ChronoDuration::seconds(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_distant_target_chains_through_max_delay() {
        let clock = Arc::new(PausedClock::new(origin()));
        let scheduler = Scheduler::new(clock.clone());
        // 60 days needs three chained links at ~24.8 days each
        let target = origin() + ChronoDuration::days(60);
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = scheduler.schedule_at(target, "distant", move || {
            let flag = flag.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
            }
        });

        handle.await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
        let overshoot = clock.now() - target;
        assert!(overshoot >= ChronoDuration::zero());
        assert!(overshoot < ChronoDuration::seconds(1));
    }
}
