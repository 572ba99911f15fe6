//! Request-scoped caller state.

use crate::common::auth::{AuthError, Role};
use crate::common::MemberId;

/// Caller identity resolved by the identity middleware.
///
/// This is the same for all domains - just tracks request-scoped data
/// like the caller's member ID and role. Domain-specific results come
/// from action return values.
#[derive(Clone, Default)]
pub struct AppState {
    /// The authenticated caller's member ID, if any.
    pub member_id: Option<MemberId>,
    /// The caller's role, if authenticated.
    pub role: Option<Role>,
}

impl AppState {
    /// Create state for an authenticated caller.
    pub fn authenticated(member_id: MemberId, role: Role) -> Self {
        Self {
            member_id: Some(member_id),
            role: Some(role),
        }
    }

    /// Create state for an unauthenticated/anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Check if the caller is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.member_id.is_some()
    }

    /// Require the caller to be authenticated.
    /// Returns the member_id or an error.
    pub fn require_auth(&self) -> Result<MemberId, AuthError> {
        self.member_id.ok_or(AuthError::AuthenticationRequired)
    }

    /// Require the caller to hold one of the given roles.
    /// Returns the member_id or an error.
    pub fn require_role(&self, allowed: &[Role]) -> Result<MemberId, AuthError> {
        let member_id = self.require_auth()?;
        match self.role {
            Some(role) if allowed.contains(&role) => Ok(member_id),
            Some(role) => Err(AuthError::PermissionDenied(format!(
                "role '{}' may not perform this operation",
                role
            ))),
            None => Err(AuthError::AuthenticationRequired),
        }
    }
}
