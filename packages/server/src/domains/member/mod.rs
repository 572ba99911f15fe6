//! Member domain: platform users and role resolution.

pub mod models;

pub use models::member::Member;
