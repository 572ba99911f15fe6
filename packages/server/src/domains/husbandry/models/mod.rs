pub mod feeding;
pub mod health_event;
