pub mod animal;
pub mod event_type;
