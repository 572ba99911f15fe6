// HTTP routes
pub mod breeding;
pub mod health;
pub mod husbandry;
pub mod notifications;
pub mod stream;
