//! Low-stock alert construction, shared by the ledger consumers and the
//! daily review task.

use crate::common::Role;
use crate::domains::stock::models::stock_item::StockItem;

/// Recipients of stock alerts.
pub const LOW_STOCK_ROLES: &[Role] = &[Role::Admin, Role::Operator];

/// Title and body for a low-stock notification.
pub fn low_stock_message(item: &StockItem) -> (String, String) {
    (
        "Low stock".to_string(),
        format!(
            "{} is down to {} {} - close to the minimum reserve.",
            item.name, item.quantity, item.unit
        ),
    )
}
