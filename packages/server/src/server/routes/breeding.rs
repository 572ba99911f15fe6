//! Breeding workflow routes: matings, diagnoses, births.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::common::{AnimalId, AppState, DiagnosisId, MatingId, Role};
use crate::domains::breeding::actions::{
    birth::{record_birth, RecordBirth},
    diagnosis::{delete_diagnosis, record_diagnosis, update_diagnosis, RecordDiagnosis},
    mating::{delete_mating, register_mating, update_mating, RegisterMating, UpdateMating},
};
use crate::domains::breeding::{Birth, Diagnosis, Mating};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Roles allowed to register breeding events.
const REGISTRAR_ROLES: &[Role] = &[Role::Admin, Role::Veterinarian, Role::Operator];
/// Roles allowed to delete breeding records.
const DELETE_ROLES: &[Role] = &[Role::Admin];

pub async fn register_mating_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Json(input): Json<RegisterMating>,
) -> Result<(StatusCode, Json<Mating>), ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let mating = register_mating(input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(mating)))
}

pub async fn update_mating_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMating>,
) -> Result<Json<Mating>, ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let mating = update_mating(MatingId::from_uuid(id), input, &state.deps).await?;
    Ok(Json(mating))
}

pub async fn delete_mating_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Mating>, ApiError> {
    caller.require_role(DELETE_ROLES)?;
    let mating = delete_mating(MatingId::from_uuid(id), &state.deps).await?;
    Ok(Json(mating))
}

pub async fn list_matings_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Mating>>, ApiError> {
    caller.require_auth()?;
    let matings = Mating::list_for_female(AnimalId::from_uuid(id), &state.deps.db_pool).await?;
    Ok(Json(matings))
}

pub async fn record_diagnosis_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RecordDiagnosis>,
) -> Result<(StatusCode, Json<Diagnosis>), ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let diagnosis = record_diagnosis(MatingId::from_uuid(id), input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(diagnosis)))
}

pub async fn update_diagnosis_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RecordDiagnosis>,
) -> Result<Json<Diagnosis>, ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let diagnosis = update_diagnosis(DiagnosisId::from_uuid(id), input, &state.deps).await?;
    Ok(Json(diagnosis))
}

pub async fn delete_diagnosis_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Diagnosis>, ApiError> {
    caller.require_role(DELETE_ROLES)?;
    let diagnosis = delete_diagnosis(DiagnosisId::from_uuid(id), &state.deps).await?;
    Ok(Json(diagnosis))
}

pub async fn record_birth_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(caller): Extension<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RecordBirth>,
) -> Result<(StatusCode, Json<Birth>), ApiError> {
    caller.require_role(REGISTRAR_ROLES)?;
    let birth = record_birth(DiagnosisId::from_uuid(id), input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(birth)))
}
