//! Pregnancy-diagnosis recording and maintenance.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{DiagnosisId, MatingId};
use crate::domains::breeding::error::BreedingError;
use crate::domains::breeding::models::diagnosis::Diagnosis;
use crate::domains::breeding::models::mating::Mating;
use crate::domains::breeding::reminders::{arm_birth_reminder, BREEDING_ALERT_ROLES};
use crate::domains::notifications::Dispatcher;
use crate::kernel::{PostCommit, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct RecordDiagnosis {
    pub method: String,
    pub result: bool,
    pub predicted_birth_date: Option<DateTime<Utc>>,
}

/// A positive result needs a predicted birth date, a negative one must not
/// carry one.
fn check_result_date(
    result: bool,
    predicted_birth_date: Option<DateTime<Utc>>,
) -> Result<(), BreedingError> {
    match (result, predicted_birth_date) {
        (true, None) => Err(BreedingError::Validation(
            "a positive diagnosis requires a predicted birth date".into(),
        )),
        (false, Some(_)) => Err(BreedingError::Validation(
            "a negative diagnosis cannot carry a predicted birth date".into(),
        )),
        _ => Ok(()),
    }
}

/// Record the one diagnosis a mating may have.
///
/// Broadcasts immediately (success tone with days remaining when positive,
/// informational when negative); a positive result also arms the
/// birth-approaching reminder after commit.
pub async fn record_diagnosis(
    mating_id: MatingId,
    input: RecordDiagnosis,
    deps: &ServerDeps,
) -> Result<Diagnosis, BreedingError> {
    let mating = Mating::find_by_id(mating_id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("mating", mating_id.into_uuid()))?;

    check_result_date(input.result, input.predicted_birth_date)?;

    let mut tx = deps.db_pool.begin().await?;

    let existing = Diagnosis::find_by_mating(mating_id, &deps.db_pool).await?;
    if existing.is_some() {
        return Err(BreedingError::Conflict(format!(
            "mating {} already has a diagnosis",
            mating.tag
        )));
    }

    let diagnosis = Diagnosis::insert(
        &mut tx,
        mating_id,
        &input.method,
        input.result,
        input.predicted_birth_date,
    )
    .await
    .map_err(|e| {
        BreedingError::on_unique_violation(e, "a diagnosis for this mating already exists")
    })?;

    tx.commit().await?;

    let mut hooks = PostCommit::new();
    let dispatcher = Dispatcher::new(deps.db_pool.clone(), deps.push_hub.clone(), deps.clock.clone());
    let (title, body, severity) = match (diagnosis.result, diagnosis.predicted_birth_date) {
        (true, Some(predicted)) => {
            let days_remaining = (predicted - deps.clock.now()).num_days().max(0);
            (
                "Positive pregnancy diagnosis".to_string(),
                format!(
                    "Mating {}: birth predicted for {} ({} days away).",
                    mating.tag,
                    predicted.format("%d/%m/%Y"),
                    days_remaining
                ),
                "success",
            )
        }
        _ => (
            "Negative pregnancy diagnosis".to_string(),
            format!("Mating {}: the pregnancy test came back negative.", mating.tag),
            "info",
        ),
    };
    hooks.push(async move {
        dispatcher
            .broadcast_to_roles(&title, &body, severity, "breeding", BREEDING_ALERT_ROLES)
            .await;
    });

    if diagnosis.result {
        arm_birth_reminder(deps, &diagnosis);
    }
    hooks.run().await;

    Ok(diagnosis)
}

/// A diagnosis with a recorded birth is locked positive; flipping it
/// negative would orphan the birth and falsely unblock the next mating.
fn check_result_against_birth(result: bool, has_birth: bool) -> Result<(), BreedingError> {
    if !result && has_birth {
        return Err(BreedingError::Conflict(
            "diagnosis has a recorded birth and cannot be made negative".into(),
        ));
    }
    Ok(())
}

/// Update a diagnosis, re-validating the result/date invariant and the
/// positive-while-birthed invariant.
pub async fn update_diagnosis(
    id: DiagnosisId,
    input: RecordDiagnosis,
    deps: &ServerDeps,
) -> Result<Diagnosis, BreedingError> {
    check_result_date(input.result, input.predicted_birth_date)?;

    Diagnosis::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("diagnosis", id.into_uuid()))?;

    check_result_against_birth(input.result, Diagnosis::has_birth(id, &deps.db_pool).await?)?;

    Diagnosis::update(
        id,
        &input.method,
        input.result,
        input.predicted_birth_date,
        &deps.db_pool,
    )
    .await?
    .ok_or_else(|| BreedingError::NotFound("diagnosis", id.into_uuid()))
}

/// Soft-delete a diagnosis. Refused while a birth is attached.
pub async fn delete_diagnosis(id: DiagnosisId, deps: &ServerDeps) -> Result<Diagnosis, BreedingError> {
    if Diagnosis::has_birth(id, &deps.db_pool).await? {
        return Err(BreedingError::Conflict(
            "diagnosis has a recorded birth and cannot be deleted".into(),
        ));
    }
    Diagnosis::soft_delete(id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("diagnosis", id.into_uuid()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_requires_predicted_date() {
        assert!(check_result_date(true, None).is_err());
        assert!(check_result_date(true, Some(Utc::now())).is_ok());
    }

    #[test]
    fn test_negative_forbids_predicted_date() {
        assert!(check_result_date(false, Some(Utc::now())).is_err());
        assert!(check_result_date(false, None).is_ok());
    }

    #[test]
    fn test_birthed_diagnosis_cannot_be_made_negative() {
        let err = check_result_against_birth(false, true).unwrap_err();
        assert!(matches!(err, BreedingError::Conflict(_)));
    }

    #[test]
    fn test_result_change_allowed_without_a_birth() {
        assert!(check_result_against_birth(false, false).is_ok());
        assert!(check_result_against_birth(true, true).is_ok());
        assert!(check_result_against_birth(true, false).is_ok());
    }
}
