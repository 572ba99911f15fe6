// Business domains
pub mod breeding;
pub mod herd;
pub mod husbandry;
pub mod member;
pub mod notifications;
pub mod stock;
