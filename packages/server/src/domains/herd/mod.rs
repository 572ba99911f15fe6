//! Herd domain: animals and birth event-type reference data.

pub mod models;

pub use models::animal::{Animal, Sex};
pub use models::event_type::EventType;
