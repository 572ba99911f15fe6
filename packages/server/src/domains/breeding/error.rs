use thiserror::Error;
use uuid::Uuid;

/// The specific reason the sequential gate refused a new mating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceBlock {
    #[error("mating chain is incomplete: expected {expected} matings on record, found {found}")]
    MissingPriorMating { expected: i32, found: i64 },

    #[error("mating MONTA-{sequence} has no pregnancy diagnosis yet")]
    MissingDiagnosis { sequence: i32 },

    #[error("mating MONTA-{sequence} has a positive diagnosis but no recorded birth")]
    PendingBirth { sequence: i32 },
}

/// Errors of the breeding state machine.
#[derive(Error, Debug)]
pub enum BreedingError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("sequence violated: {0}")]
    Sequence(#[from] SequenceBlock),

    #[error("{0} {1} not found")]
    NotFound(&'static str, Uuid),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BreedingError {
    /// Map a unique-index violation to `Conflict`; anything else stays a
    /// database error. The partial unique indexes are the storage-layer
    /// backstop for the one-to-one invariants under concurrent requests.
    pub fn on_unique_violation(e: sqlx::Error, conflict: &str) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                BreedingError::Conflict(conflict.to_string())
            }
            _ => BreedingError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    /// Minimal database error carrying a SQLSTATE code, standing in for
    /// what the driver surfaces on a constraint violation.
    #[derive(Debug)]
    struct ConstraintViolation(&'static str);

    impl fmt::Display for ConstraintViolation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl StdError for ConstraintViolation {}

    impl sqlx::error::DatabaseError for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let e = sqlx::Error::Database(Box::new(ConstraintViolation("23505")));
        let mapped = BreedingError::on_unique_violation(e, "a diagnosis for this mating already exists");
        assert!(matches!(
            mapped,
            BreedingError::Conflict(msg) if msg == "a diagnosis for this mating already exists"
        ));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let fk = sqlx::Error::Database(Box::new(ConstraintViolation("23503")));
        assert!(matches!(
            BreedingError::on_unique_violation(fk, "unused"),
            BreedingError::Database(_)
        ));
        assert!(matches!(
            BreedingError::on_unique_violation(sqlx::Error::PoolClosed, "unused"),
            BreedingError::Database(_)
        ));
    }
}
