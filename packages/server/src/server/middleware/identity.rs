//! Identity middleware.
//!
//! Authentication happens upstream of this service; requests arrive with the
//! caller's member id in an `x-member-id` header. The middleware resolves the
//! header against the members table and inserts an `AppState` into request
//! extensions. Absent, malformed, or unknown ids fall through as anonymous -
//! each route decides whether anonymous access is acceptable.

use axum::extract::Extension;
use axum::{middleware::Next, response::Response};
use tracing::debug;
use uuid::Uuid;

use crate::common::{AppState, MemberId};
use crate::domains::member::Member;
use crate::server::app::AxumAppState;

pub async fn identity_middleware(
    Extension(state): Extension<AxumAppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let app_state = match resolve_caller(request.headers(), &state).await {
        Some(member) => {
            debug!("Authenticated member: {} ({})", member.id, member.role);
            AppState::authenticated(member.id, member.role)
        }
        None => {
            debug!("No resolvable member identity");
            AppState::anonymous()
        }
    };

    request.extensions_mut().insert(app_state);
    next.run(request).await
}

/// Parse the header and look the member up. Inactive and soft-deleted
/// members do not resolve.
async fn resolve_caller(
    headers: &axum::http::HeaderMap,
    state: &AxumAppState,
) -> Option<Member> {
    let header = headers.get("x-member-id")?;
    let raw = header.to_str().ok()?;
    let uuid = Uuid::parse_str(raw).ok()?;

    match Member::find_by_id(MemberId::from_uuid(uuid), &state.deps.db_pool).await {
        Ok(Some(member)) if member.active => Some(member),
        Ok(_) => None,
        Err(e) => {
            tracing::error!(error = %e, "member lookup failed during identity resolution");
            None
        }
    }
}
