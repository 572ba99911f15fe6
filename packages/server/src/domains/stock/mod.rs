//! Stock domain: consumable inventory with a protected minimum reserve.

pub mod alerts;
pub mod error;
pub mod ledger;
pub mod models;

pub use alerts::{low_stock_message, LOW_STOCK_ROLES};
pub use error::StockError;
pub use ledger::{WithdrawalOutcome, LOW_STOCK_MARGIN, MINIMUM_RESERVE};
pub use models::stock_item::StockItem;
