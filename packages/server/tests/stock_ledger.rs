//! Stock ledger rule scenarios on the public surface.

use server_core::domains::stock::ledger::{check_withdrawal, LOW_STOCK_MARGIN, MINIMUM_RESERVE};
use server_core::domains::stock::StockError;

#[test]
fn withdrawal_leaves_quantity_above_reserve() {
    let outcome = check_withdrawal(100, 30).unwrap();
    assert_eq!(outcome.new_quantity, 70);
    assert!(!outcome.low_stock);
}

#[test]
fn reserve_is_a_hard_floor() {
    // 1000 on hand; taking 991 would leave 9, one below the reserve.
    let err = check_withdrawal(1000, 991).unwrap_err();
    assert!(matches!(
        err,
        StockError::WouldBreachMinimum {
            requested: 991,
            would_leave: 9,
            reserve: MINIMUM_RESERVE,
        }
    ));

    // Landing exactly on the reserve is allowed, and flagged.
    let outcome = check_withdrawal(1000, 990).unwrap();
    assert_eq!(outcome.new_quantity, MINIMUM_RESERVE);
    assert!(outcome.low_stock);
}

#[test]
fn low_stock_raised_inside_the_margin() {
    let outcome = check_withdrawal(1000, 985).unwrap();
    assert_eq!(outcome.new_quantity, MINIMUM_RESERVE + LOW_STOCK_MARGIN);
    assert!(outcome.low_stock);

    let outcome = check_withdrawal(1000, 984).unwrap();
    assert_eq!(outcome.new_quantity, 16);
    assert!(!outcome.low_stock);
}

#[test]
fn exhausted_item_refuses_any_withdrawal() {
    let err = check_withdrawal(MINIMUM_RESERVE, 1).unwrap_err();
    assert!(matches!(err, StockError::BelowMinimum { .. }));
}

#[test]
fn invalid_and_oversized_amounts_are_refused_first() {
    assert!(matches!(
        check_withdrawal(100, 0).unwrap_err(),
        StockError::InvalidAmount(0)
    ));
    assert!(matches!(
        check_withdrawal(5, 20).unwrap_err(),
        StockError::InsufficientStock {
            requested: 20,
            available: 5
        }
    ));
}
