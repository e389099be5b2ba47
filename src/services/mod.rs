//! Background services

pub mod stock_watch;

pub use stock_watch::{StockWatchConfig, StockWatcher, StockWatcherHandle};
