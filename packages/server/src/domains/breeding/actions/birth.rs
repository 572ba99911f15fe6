//! Birth recording: the terminal transition that closes a positive diagnosis
//! and unblocks the female's next mating.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::common::{DiagnosisId, EventTypeId};
use crate::domains::breeding::error::BreedingError;
use crate::domains::breeding::models::birth::Birth;
use crate::domains::breeding::models::diagnosis::Diagnosis;
use crate::domains::herd::EventType;
use crate::kernel::ServerDeps;

/// Tolerance for clock skew and next-day backfill on the event date.
pub const BIRTH_DATE_TOLERANCE_DAYS: i64 = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordBirth {
    pub event_type_id: EventTypeId,
    pub event_date: DateTime<Utc>,
    pub note: Option<String>,
}

/// The event date may not sit farther ahead than the tolerance allows.
fn check_event_date(event_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), BreedingError> {
    if event_date > now + Duration::days(BIRTH_DATE_TOLERANCE_DAYS) {
        return Err(BreedingError::Validation(format!(
            "birth date may not be more than {} days in the future",
            BIRTH_DATE_TOLERANCE_DAYS
        )));
    }
    Ok(())
}

/// Record the birth that closes a positive diagnosis.
pub async fn record_birth(
    diagnosis_id: DiagnosisId,
    input: RecordBirth,
    deps: &ServerDeps,
) -> Result<Birth, BreedingError> {
    let diagnosis = Diagnosis::find_by_id(diagnosis_id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("diagnosis", diagnosis_id.into_uuid()))?;

    if !diagnosis.result {
        return Err(BreedingError::Validation(
            "a birth can only be recorded for a positive diagnosis".into(),
        ));
    }

    EventType::find_by_id(input.event_type_id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("event type", input.event_type_id.into_uuid()))?;

    check_event_date(input.event_date, deps.clock.now())?;

    let mut tx = deps.db_pool.begin().await?;

    if Diagnosis::has_birth(diagnosis_id, &deps.db_pool).await? {
        return Err(BreedingError::Conflict(
            "a birth is already recorded for this diagnosis".into(),
        ));
    }

    let birth = Birth::insert(
        &mut tx,
        diagnosis_id,
        input.event_type_id,
        input.note.as_deref(),
        input.event_date,
    )
    .await
    .map_err(|e| BreedingError::on_unique_violation(e, "a birth for this diagnosis already exists"))?;

    tx.commit().await?;

    Ok(birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_tomorrow_is_within_tolerance() {
        assert!(check_event_date(now() + Duration::days(1), now()).is_ok());
    }

    #[test]
    fn test_exactly_two_days_ahead_is_allowed() {
        assert!(check_event_date(now() + Duration::days(2), now()).is_ok());
    }

    #[test]
    fn test_past_dates_are_allowed() {
        assert!(check_event_date(now() - Duration::days(30), now()).is_ok());
    }

    #[test]
    fn test_three_days_ahead_is_refused() {
        assert!(check_event_date(now() + Duration::days(3), now()).is_err());
    }
}
