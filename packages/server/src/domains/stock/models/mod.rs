pub mod stock_item;
