use thiserror::Error;
use uuid::Uuid;

/// Ledger invariant violations surfaced to callers.
#[derive(Error, Debug)]
pub enum StockError {
    #[error("stock item {0} not found")]
    NotFound(Uuid),

    #[error("withdrawal amount must be positive, got {0}")]
    InvalidAmount(i32),

    #[error("cannot withdraw {requested} units: only {available} in stock")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("stock is at {quantity} units, already at or below the minimum reserve of {reserve}")]
    BelowMinimum { quantity: i32, reserve: i32 },

    #[error(
        "withdrawing {requested} units would leave {would_leave}, below the minimum reserve of {reserve}"
    )]
    WouldBreachMinimum {
        requested: i32,
        would_leave: i32,
        reserve: i32,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
