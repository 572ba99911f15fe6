use thiserror::Error;
use uuid::Uuid;

use crate::domains::stock::StockError;

/// Errors of the feeding / health-event operations.
#[derive(Error, Debug)]
pub enum HusbandryError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} {1} not found")]
    NotFound(&'static str, Uuid),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
