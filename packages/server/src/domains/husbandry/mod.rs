//! Husbandry domain: feedings and health events that consume stock.

pub mod actions;
pub mod error;
pub mod models;

pub use error::HusbandryError;
pub use models::feeding::Feeding;
pub use models::health_event::{HealthEvent, HealthEventConsumable};
