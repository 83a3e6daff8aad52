// Stock Store Port (Interface)

use super::statement::{StockCommand, StockQuery};
use super::transaction::Transaction;
use crate::domain::Stock;
use crate::error::Result;
use async_trait::async_trait;

/// Session factory for the transactional store
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Open a session and begin its transaction
    ///
    /// Fails with `AppError::PoolExhausted` when no connection can be
    /// checked out of the pool in time.
    async fn begin(&self) -> Result<Box<dyn StockSession>>;
}

/// One unit of work against the store (within a transaction)
#[async_trait]
pub trait StockSession: Transaction {
    /// Run a read statement
    async fn query(&mut self, query: &StockQuery) -> Result<Vec<Stock>>;

    /// Run a write statement, returning the number of affected rows
    async fn execute(&mut self, command: &StockCommand) -> Result<u64>;

    /// Insert the stock, or replace the row with the same symbol
    async fn save(&mut self, stock: &Stock) -> Result<()>;

    /// Load a stock by primary key
    async fn load(&mut self, symbol: &str) -> Result<Option<Stock>>;

    /// Delete a previously loaded stock
    async fn delete(&mut self, stock: &Stock) -> Result<()>;
}
