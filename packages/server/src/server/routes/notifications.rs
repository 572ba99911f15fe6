//! Notification routes: listing and read-state maintenance.
//!
//! All operations are scoped to the calling member; any authenticated
//! role may use them.

use axum::{
    extract::{Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::common::{AppState, NotificationId};
use crate::domains::notifications::Notification;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

pub async fn list_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let member_id = caller.require_auth()?;
    let notifications = Notification::list_for_member(member_id, &state.deps.db_pool).await?;
    Ok(Json(notifications))
}

pub async fn mark_read_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let member_id = caller.require_auth()?;
    Notification::mark_read(NotificationId::from_uuid(id), member_id, &state.deps.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("notification {} not found", id)))
}

pub async fn mark_all_read_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let member_id = caller.require_auth()?;
    let updated = Notification::mark_all_read(member_id, &state.deps.db_pool).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn clear_read_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let member_id = caller.require_auth()?;
    let cleared = Notification::clear_read(member_id, &state.deps.db_pool).await?;
    Ok(Json(serde_json::json!({ "cleared": cleared })))
}
