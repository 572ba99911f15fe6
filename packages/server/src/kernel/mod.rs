//! Kernel module - server infrastructure and dependencies.

pub mod clock;
pub mod deps;
pub mod post_commit;
pub mod push_hub;
pub mod scheduled_tasks;
pub mod scheduler;

pub use clock::{BaseClock, SystemClock};
pub use deps::ServerDeps;
pub use post_commit::PostCommit;
pub use push_hub::PushHub;
pub use scheduler::{Scheduler, MAX_TIMER_DELAY};
