//! Deferred-scheduler behaviour under paused tokio time, on the public
//! surface: fires reach targets beyond a single timer's range.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use server_core::kernel::{BaseClock, Scheduler, MAX_TIMER_DELAY};

/// Clock that tracks tokio's (paused) timer from a fixed origin.
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
    "2025-06-01T08:00:00Z".parse().unwrap()
}

#[tokio::test(start_paused = true)]
async fn fires_at_a_target_within_one_timer() {
    let clock = Arc::new(PausedClock::new(origin()));
    let scheduler = Scheduler::new(clock);
    let fired = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&fired);
    let handle = scheduler.schedule_at(origin() + ChronoDuration::hours(6), "test", move || {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
        }
    });

    tokio::time::advance(std::time::Duration::from_secs(6 * 3600 - 1)).await;
    tokio::task::yield_now().await;
    assert!(!fired.load(Ordering::SeqCst));

    tokio::time::advance(std::time::Duration::from_secs(2)).await;
    handle.await.unwrap();
    assert!(fired.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn chains_timers_past_the_single_timer_limit() {
    // 60 days out - more than two maximum-length timer links.
    let target = origin() + ChronoDuration::days(60);
    assert!(ChronoDuration::days(60).to_std().unwrap() > 2 * MAX_TIMER_DELAY);

    let clock = Arc::new(PausedClock::new(origin()));
    let scheduler = Scheduler::new(clock);
    let fired = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&fired);
    let handle = scheduler.schedule_at(target, "far-future", move || {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
        }
    });

    // One full link in: nowhere near firing yet.
    tokio::time::advance(MAX_TIMER_DELAY).await;
    tokio::task::yield_now().await;
    assert!(!fired.load(Ordering::SeqCst));

    // Jump past the target and let the remaining links unwind.
    tokio::time::advance(std::time::Duration::from_secs(61 * 24 * 3600)).await;
    handle.await.unwrap();
    assert!(fired.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn past_targets_fire_immediately() {
    let clock = Arc::new(PausedClock::new(origin()));
    let scheduler = Scheduler::new(clock);
    let fired = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&fired);
    let handle = scheduler.schedule_at(origin() - ChronoDuration::days(1), "overdue", move || {
        let flag = Arc::clone(&flag);
        async move {
            flag.store(true, Ordering::SeqCst);
        }
    });

    handle.await.unwrap();
    assert!(fired.load(Ordering::SeqCst));
}
