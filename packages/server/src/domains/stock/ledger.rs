//! Stock ledger rules: withdrawals protect a minimum reserve, restores are
//! unconditional.
//!
//! Withdraw and restore run on the caller's open transaction so that the
//! stock mutation commits atomically with the consuming record (feeding,
//! health event). The low-stock signal is returned to the caller, which
//! notifies after commit - the ledger itself never talks to the dispatcher.

use sqlx::PgConnection;

use crate::common::StockItemId;
use crate::domains::stock::error::StockError;
use crate::domains::stock::models::stock_item::StockItem;

/// Units every item must retain; withdrawals may never cross it.
pub const MINIMUM_RESERVE: i32 = 10;

/// Landing within this margin above the reserve raises the low-stock signal.
pub const LOW_STOCK_MARGIN: i32 = 5;

/// Result of a permitted withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalOutcome {
    pub new_quantity: i32,
    /// Quantity landed at or below `MINIMUM_RESERVE + LOW_STOCK_MARGIN`.
    pub low_stock: bool,
}

/// Decide whether withdrawing `amount` from a quantity is permitted.
///
/// Check order matters for error reporting: an impossible amount first, then
/// an item already exhausted to its reserve, then a breach of the reserve.
pub fn check_withdrawal(quantity: i32, amount: i32) -> Result<WithdrawalOutcome, StockError> {
    if amount <= 0 {
        return Err(StockError::InvalidAmount(amount));
    }
    if amount > quantity {
        return Err(StockError::InsufficientStock {
            requested: amount,
            available: quantity,
        });
    }
    if quantity <= MINIMUM_RESERVE {
        return Err(StockError::BelowMinimum {
            quantity,
            reserve: MINIMUM_RESERVE,
        });
    }
    let new_quantity = quantity - amount;
    if new_quantity < MINIMUM_RESERVE {
        return Err(StockError::WouldBreachMinimum {
            requested: amount,
            would_leave: new_quantity,
            reserve: MINIMUM_RESERVE,
        });
    }
    Ok(WithdrawalOutcome {
        new_quantity,
        low_stock: new_quantity <= MINIMUM_RESERVE + LOW_STOCK_MARGIN,
    })
}

/// Withdraw `amount` units inside the caller's transaction.
///
/// Locks the row (`FOR UPDATE`) so concurrent withdrawals against the same
/// item serialize at the storage layer rather than racing between the check
/// and the write.
pub async fn withdraw(
    conn: &mut PgConnection,
    item_id: StockItemId,
    amount: i32,
) -> Result<(StockItem, WithdrawalOutcome), StockError> {
    let item = sqlx::query_as::<_, StockItem>(
        "SELECT * FROM stock_items WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
    )
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StockError::NotFound(item_id.into_uuid()))?;

    let outcome = check_withdrawal(item.quantity, amount)?;

    let updated = sqlx::query_as::<_, StockItem>(
        "UPDATE stock_items SET quantity = $2 WHERE id = $1 RETURNING *",
    )
    .bind(item_id)
    .bind(outcome.new_quantity)
    .fetch_one(&mut *conn)
    .await?;

    Ok((updated, outcome))
}

/// Return `amount` units unconditionally (reversal of a withdrawal when the
/// consuming record is deleted). Never raises the low-stock signal.
pub async fn restore(
    conn: &mut PgConnection,
    item_id: StockItemId,
    amount: i32,
) -> Result<StockItem, StockError> {
    sqlx::query_as::<_, StockItem>(
        "UPDATE stock_items SET quantity = quantity + $2 WHERE id = $1 AND deleted_at IS NULL RETURNING *",
    )
    .bind(item_id)
    .bind(amount)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StockError::NotFound(item_id.into_uuid()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert!(matches!(
            check_withdrawal(100, 0),
            Err(StockError::InvalidAmount(0))
        ));
        assert!(matches!(
            check_withdrawal(100, -3),
            Err(StockError::InvalidAmount(-3))
        ));
    }

    #[test]
    fn test_insufficient_stock() {
        let err = check_withdrawal(50, 60).unwrap_err();
        assert!(matches!(
            err,
            StockError::InsufficientStock {
                requested: 60,
                available: 50
            }
        ));
    }

    #[test]
    fn test_item_at_reserve_cannot_be_withdrawn_at_all() {
        let err = check_withdrawal(MINIMUM_RESERVE, 1).unwrap_err();
        assert!(matches!(err, StockError::BelowMinimum { .. }));

        let err = check_withdrawal(MINIMUM_RESERVE - 2, 1).unwrap_err();
        assert!(matches!(err, StockError::BelowMinimum { .. }));
    }

    #[test]
    fn test_breach_of_reserve_refused() {
        // 1000 - 991 = 9, one below the reserve of 10
        let err = check_withdrawal(1000, 991).unwrap_err();
        assert!(matches!(
            err,
            StockError::WouldBreachMinimum {
                would_leave: 9,
                reserve: MINIMUM_RESERVE,
                ..
            }
        ));
    }

    #[test]
    fn test_landing_on_margin_raises_low_stock() {
        // 1000 - 985 = 15 = reserve + margin
        let outcome = check_withdrawal(1000, 985).unwrap();
        assert_eq!(outcome.new_quantity, 15);
        assert!(outcome.low_stock);
    }

    #[test]
    fn test_comfortable_withdrawal_is_quiet() {
        let outcome = check_withdrawal(1000, 100).unwrap();
        assert_eq!(outcome.new_quantity, 900);
        assert!(!outcome.low_stock);
    }

    #[test]
    fn test_landing_exactly_on_reserve_is_permitted() {
        let outcome = check_withdrawal(30, 20).unwrap();
        assert_eq!(outcome.new_quantity, MINIMUM_RESERVE);
        assert!(outcome.low_stock);
    }
}
