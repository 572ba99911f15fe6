// Ranch Management Platform - API Core
//
// This crate provides the backend API for the livestock reproductive
// lifecycle: matings, pregnancy diagnoses and births, plus the stock
// ledger and the notification/reminder machinery around them.
//
// Architecture follows domain-driven design: infrastructure in kernel/,
// business rules in domains/*, HTTP surface in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
