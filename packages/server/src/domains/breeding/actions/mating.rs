//! Mating registration and maintenance.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{AnimalId, MatingId};
use crate::domains::breeding::error::BreedingError;
use crate::domains::breeding::gate::{check_gate, sequence_tag};
use crate::domains::breeding::models::mating::Mating;
use crate::domains::breeding::reminders::{arm_mating_reminder, BREEDING_ALERT_ROLES};
use crate::domains::herd::{Animal, Sex};
use crate::domains::notifications::Dispatcher;
use crate::kernel::{PostCommit, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMating {
    pub female_id: AnimalId,
    pub male_id: Option<AnimalId>,
    pub event_date: DateTime<Utc>,
    pub note: Option<String>,
    /// Pre-marking a mating resolved skips the alert and the reminder.
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMating {
    pub event_date: DateTime<Utc>,
    pub note: Option<String>,
    pub resolved: bool,
}

/// Register the next mating in a female's chain.
///
/// Validates both animal references, takes the sequential gate inside the
/// insert transaction, and - for unresolved matings - broadcasts an alert
/// and arms the day-before reminder once the transaction has committed.
pub async fn register_mating(
    input: RegisterMating,
    deps: &ServerDeps,
) -> Result<Mating, BreedingError> {
    let female = Animal::find_by_id(input.female_id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::Validation("female not found".into()))?;
    if female.sex != Sex::Female {
        return Err(BreedingError::Validation(format!(
            "animal {} is not female",
            female.tag
        )));
    }
    if let Some(male_id) = input.male_id {
        let male = Animal::find_by_id(male_id, &deps.db_pool)
            .await?
            .ok_or_else(|| BreedingError::Validation("male not found".into()))?;
        if male.sex != Sex::Male {
            return Err(BreedingError::Validation(format!(
                "animal {} is not male",
                male.tag
            )));
        }
    }

    let mut tx = deps.db_pool.begin().await?;

    let snapshot = Mating::chain_snapshot(&mut tx, input.female_id).await?;
    let sequence = check_gate(&snapshot)?;

    let mating = Mating::insert(
        &mut tx,
        input.female_id,
        input.male_id,
        sequence,
        &sequence_tag(sequence),
        input.note.as_deref(),
        input.resolved,
        input.event_date,
    )
    .await
    .map_err(|e| BreedingError::on_unique_violation(e, "concurrent mating registration"))?;

    tx.commit().await?;

    let mut hooks = PostCommit::new();
    if !mating.resolved {
        let dispatcher = Dispatcher::new(deps.db_pool.clone(), deps.push_hub.clone(), deps.clock.clone());
        let title = "Mating registered".to_string();
        let body = format!(
            "Mating {} for female {} registered for {}.",
            mating.tag,
            female.tag,
            mating.event_date.format("%d/%m/%Y")
        );
        hooks.push(async move {
            dispatcher
                .broadcast_to_roles(&title, &body, "info", "breeding", BREEDING_ALERT_ROLES)
                .await;
        });

        arm_mating_reminder(deps, &mating);
    }
    hooks.run().await;

    Ok(mating)
}

/// Update a mating. Flipping `resolved` false-to-true broadcasts a
/// completion notice.
pub async fn update_mating(
    id: MatingId,
    input: UpdateMating,
    deps: &ServerDeps,
) -> Result<Mating, BreedingError> {
    let existing = Mating::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("mating", id.into_uuid()))?;

    let updated = Mating::update(
        id,
        input.note.as_deref(),
        input.resolved,
        input.event_date,
        &deps.db_pool,
    )
    .await?
    .ok_or_else(|| BreedingError::NotFound("mating", id.into_uuid()))?;

    if !existing.resolved && updated.resolved {
        let dispatcher = Dispatcher::new(deps.db_pool.clone(), deps.push_hub.clone(), deps.clock.clone());
        let body = format!("Mating {} was marked completed.", updated.tag);
        dispatcher
            .broadcast_to_roles(
                "Mating completed",
                &body,
                "success",
                "breeding",
                BREEDING_ALERT_ROLES,
            )
            .await;
    }

    Ok(updated)
}

/// Soft-delete a mating. Refused while a diagnosis is attached.
pub async fn delete_mating(id: MatingId, deps: &ServerDeps) -> Result<Mating, BreedingError> {
    if Mating::has_diagnosis(id, &deps.db_pool).await? {
        return Err(BreedingError::Conflict(
            "mating has a diagnosis and cannot be deleted".into(),
        ));
    }
    Mating::soft_delete(id, &deps.db_pool)
        .await?
        .ok_or_else(|| BreedingError::NotFound("mating", id.into_uuid()))
}
