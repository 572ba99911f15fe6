//! Roles and authorization errors.
//!
//! Authentication itself lives outside this service; requests arrive with a
//! resolved member identity and the routes check that member's role against
//! the role set each operation requires.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform roles, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Veterinarian,
    Operator,
}

impl Role {
    /// Lowercase name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Veterinarian => "veterinarian",
            Role::Operator => "operator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization errors for the ranch platform
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}
