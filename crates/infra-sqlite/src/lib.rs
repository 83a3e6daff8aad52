// stockdal Infrastructure - SQLite Adapter
// Implements: StockStore, StockSession

mod connection;
mod error;
mod migration;
mod stock_store;
mod transaction;

pub use connection::{create_pool, SqliteSettings};
pub use migration::run_migrations;
pub use stock_store::SqliteStockStore;
pub use transaction::SqliteStockSession;
