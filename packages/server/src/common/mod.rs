//! Shared types used across domains: typed IDs, roles, request-scoped state.

pub mod app_state;
pub mod auth;
pub mod entity_ids;
pub mod id;

pub use app_state::AppState;
pub use auth::{AuthError, Role};
pub use entity_ids::*;
pub use id::{Id, V4, V7};
