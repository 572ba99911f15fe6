//! Notifications domain: persisted member-addressed messages and the
//! real-time dispatcher.

pub mod dispatcher;
pub mod models;

pub use dispatcher::Dispatcher;
pub use models::notification::Notification;
