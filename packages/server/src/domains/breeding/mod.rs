//! Breeding domain: the mating -> diagnosis -> birth state machine.
//!
//! Per female, matings form a strictly ordered chain; each link closes with
//! either a completed birth or a negative diagnosis before the next may open.
//! Gate decisions live in `gate`, persistence in `models`, the operations in
//! `actions`, and the deferred alerts in `reminders`.

pub mod actions;
pub mod error;
pub mod gate;
pub mod models;
pub mod reminders;

pub use error::{BreedingError, SequenceBlock};
pub use models::birth::Birth;
pub use models::diagnosis::Diagnosis;
pub use models::mating::Mating;
