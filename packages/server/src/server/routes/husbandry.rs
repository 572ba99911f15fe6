//! Husbandry routes: feedings, health events, and stock lookups.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::common::{AppState, FeedingId, HealthEventId, Role, StockItemId};
use crate::domains::husbandry::actions::{
    delete_feeding, delete_health_event, record_feeding, record_health_event, RecordFeeding,
    RecordHealthEvent,
};
use crate::domains::husbandry::{Feeding, HealthEvent};
use crate::domains::stock::StockItem;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

const REGISTRAR_ROLES: &[Role] = &[Role::Admin, Role::Veterinarian, Role::Operator];
const DELETE_ROLES: &[Role] = &[Role::Admin];

pub async fn record_feeding_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Json(input): Json<RecordFeeding>,
) -> Result<(StatusCode, Json<Feeding>), ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let feeding = record_feeding(input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(feeding)))
}

pub async fn delete_feeding_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Feeding>, ApiError> {
    caller.require_role(DELETE_ROLES)?;
    let feeding = delete_feeding(FeedingId::from_uuid(id), &state.deps).await?;
    Ok(Json(feeding))
}

pub async fn record_health_event_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Json(input): Json<RecordHealthEvent>,
) -> Result<(StatusCode, Json<HealthEvent>), ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let event = record_health_event(input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn delete_health_event_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HealthEvent>, ApiError> {
    caller.require_role(DELETE_ROLES)?;
    let event = delete_health_event(HealthEventId::from_uuid(id), &state.deps).await?;
    Ok(Json(event))
}

pub async fn get_stock_item_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockItem>, ApiError> {
    caller.require_auth()?;
    StockItem::find_by_id(StockItemId::from_uuid(id), &state.deps.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("stock item {} not found", id)))
}
