// Port Layer - Interfaces for external dependencies

pub mod statement;
pub mod stock_store;
pub mod transaction;

// Re-exports
pub use statement::{StockCommand, StockQuery};
pub use stock_store::{StockSession, StockStore};
pub use transaction::Transaction;
