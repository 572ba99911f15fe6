//! Reminder scheduling for the breeding workflow.
//!
//! Reminders are armed after the owning transaction commits and live only in
//! process memory; the deferred scheduler chains timers for instants beyond a
//! single timer's reach. Because weeks can pass between arming and firing,
//! every fire callback re-reads the persisted row and stays silent when the
//! workflow has moved past the state that justified the reminder.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::common::Role;
use crate::domains::breeding::models::diagnosis::Diagnosis;
use crate::domains::breeding::models::mating::Mating;
use crate::domains::notifications::Dispatcher;
use crate::kernel::ServerDeps;

/// Fixed time-of-day reminders fire at.
pub const REMINDER_HOUR_UTC: u32 = 8;

/// Days before a predicted birth date its reminder fires.
pub const BIRTH_REMINDER_LEAD_DAYS: u64 = 7;

/// Recipients of breeding alerts and reminders.
pub const BREEDING_ALERT_ROLES: &[Role] = &[Role::Admin, Role::Veterinarian, Role::Operator];

fn at_reminder_hour(date: NaiveDate) -> DateTime<Utc> {
    // 08:00 always exists; fall back to midnight rather than panic
    let time = date
        .and_hms_opt(REMINDER_HOUR_UTC, 0, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    Utc.from_utc_datetime(&time)
}

/// One day before the mating date, at the fixed hour.
pub fn mating_reminder_instant(event_date: DateTime<Utc>) -> DateTime<Utc> {
    let day = event_date.date_naive();
    at_reminder_hour(day.checked_sub_days(Days::new(1)).unwrap_or(day))
}

/// Seven days before the predicted birth date, at the fixed hour.
pub fn birth_reminder_instant(predicted_birth_date: DateTime<Utc>) -> DateTime<Utc> {
    let day = predicted_birth_date.date_naive();
    at_reminder_hour(
        day.checked_sub_days(Days::new(BIRTH_REMINDER_LEAD_DAYS))
            .unwrap_or(day),
    )
}

/// Whether the persisted state still justifies the mating reminder.
/// Deleted (gone) or resolved matings suppress it.
fn mating_reminder_due(current: Option<&Mating>) -> bool {
    current.map(|m| !m.resolved).unwrap_or(false)
}

/// Whether the persisted state still justifies the birth reminder.
/// Deleted or re-recorded-negative diagnoses and already-closed links
/// suppress it.
fn birth_reminder_due(current: Option<&Diagnosis>, has_birth: bool) -> bool {
    current.map(|d| d.result && !has_birth).unwrap_or(false)
}

/// Arm the day-before reminder for an unresolved mating.
///
/// Suppressed at fire time when the mating was resolved or deleted in the
/// meantime. A fire instant already in the past goes through the scheduler's
/// zero-delay path and fires immediately.
pub fn arm_mating_reminder(deps: &ServerDeps, mating: &Mating) {
    let fire_at = mating_reminder_instant(mating.event_date);
    let pool = deps.db_pool.clone();
    let hub = deps.push_hub.clone();
    let clock = deps.clock.clone();
    let mating_id = mating.id;

    deps.scheduler.schedule_at(
        fire_at,
        format!("mating-reminder:{}", mating_id),
        move || async move {
            match Mating::find_by_id(mating_id, &pool).await {
                Ok(current) if mating_reminder_due(current.as_ref()) => {
                    let Some(current) = current else { return };
                    let body = format!(
                        "Mating {} is scheduled for {}.",
                        current.tag,
                        current.event_date.format("%d/%m/%Y")
                    );
                    Dispatcher::new(pool.clone(), hub, clock)
                        .broadcast_to_roles(
                            "Mating reminder",
                            &body,
                            "warning",
                            "breeding",
                            BREEDING_ALERT_ROLES,
                        )
                        .await;
                }
                Ok(_) => {
                    tracing::debug!(%mating_id, "mating reminder suppressed: state advanced");
                }
                Err(e) => {
                    tracing::error!(error = %e, %mating_id, "mating reminder: state re-check failed");
                }
            }
        },
    );
}

/// Arm the birth-approaching reminder for a positive diagnosis.
///
/// Suppressed at fire time when the diagnosis was deleted, re-recorded as
/// negative, or already closed by a birth.
pub fn arm_birth_reminder(deps: &ServerDeps, diagnosis: &Diagnosis) {
    let Some(predicted) = diagnosis.predicted_birth_date else {
        return;
    };
    let fire_at = birth_reminder_instant(predicted);
    let pool = deps.db_pool.clone();
    let hub = deps.push_hub.clone();
    let clock = deps.clock.clone();
    let diagnosis_id = diagnosis.id;

    deps.scheduler.schedule_at(
        fire_at,
        format!("birth-reminder:{}", diagnosis_id),
        move || async move {
            let current_state = async {
                let current = Diagnosis::find_by_id(diagnosis_id, &pool).await?;
                let has_birth = match &current {
                    Some(_) => Diagnosis::has_birth(diagnosis_id, &pool).await?,
                    None => false,
                };
                anyhow::Ok((current, has_birth))
            }
            .await;

            match current_state {
                Ok((current, has_birth)) if birth_reminder_due(current.as_ref(), has_birth) => {
                    let Some(current) = current else { return };
                    let predicted = current.predicted_birth_date.unwrap_or(predicted);
                    let days_remaining = (predicted - clock.now()).num_days().max(0);
                    let body = format!(
                        "Predicted birth on {} ({} days away).",
                        predicted.format("%d/%m/%Y"),
                        days_remaining
                    );
                    Dispatcher::new(pool.clone(), hub, clock)
                        .broadcast_to_roles(
                            "Birth approaching",
                            &body,
                            "warning",
                            "breeding",
                            BREEDING_ALERT_ROLES,
                        )
                        .await;
                }
                Ok(_) => {
                    tracing::debug!(%diagnosis_id, "birth reminder suppressed: state advanced");
                }
                Err(e) => {
                    tracing::error!(error = %e, %diagnosis_id, "birth reminder: state re-check failed");
                }
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_mating_reminder_day_before_at_fixed_hour() {
        let event: DateTime<Utc> = "2025-05-10T14:30:00Z".parse().unwrap();
        let fire = mating_reminder_instant(event);
        assert_eq!(fire.to_rfc3339(), "2025-05-09T08:00:00+00:00");
    }

    #[test]
    fn test_birth_reminder_week_before_at_fixed_hour() {
        let predicted: DateTime<Utc> = "2025-08-20T00:00:00Z".parse().unwrap();
        let fire = birth_reminder_instant(predicted);
        assert_eq!(fire.to_rfc3339(), "2025-08-13T08:00:00+00:00");
    }

    fn mating_fixture(resolved: bool) -> Mating {
        Mating {
            id: crate::common::MatingId::new(),
            female_id: crate::common::AnimalId::new(),
            male_id: None,
            sequence_number: 1,
            tag: "MONTA-1".into(),
            note: None,
            resolved,
            event_date: Utc::now(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn diagnosis_fixture(result: bool) -> Diagnosis {
        Diagnosis {
            id: crate::common::DiagnosisId::new(),
            mating_id: crate::common::MatingId::new(),
            method: "palpation".into(),
            result,
            predicted_birth_date: result.then(Utc::now),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_mating_reminder_fires_only_while_unresolved() {
        let open = mating_fixture(false);
        assert!(mating_reminder_due(Some(&open)));

        let resolved = mating_fixture(true);
        assert!(!mating_reminder_due(Some(&resolved)));

        // row deleted between arming and firing
        assert!(!mating_reminder_due(None));
    }

    #[test]
    fn test_birth_reminder_fires_only_for_open_positive_diagnosis() {
        let positive = diagnosis_fixture(true);
        assert!(birth_reminder_due(Some(&positive), false));

        // birth already closed the link
        assert!(!birth_reminder_due(Some(&positive), true));

        let negative = diagnosis_fixture(false);
        assert!(!birth_reminder_due(Some(&negative), false));

        // row deleted between arming and firing
        assert!(!birth_reminder_due(None, false));
    }

    #[test]
    fn test_reminder_instants_cross_month_boundaries() {
        let event: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        let fire = mating_reminder_instant(event);
        assert_eq!(fire.date_naive().month(), 2);
        assert_eq!(fire.date_naive().day(), 28);
    }
}
