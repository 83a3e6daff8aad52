// Stock Service - Domain operations on Stock, delegated to the store client

use super::store_client::StoreClient;
use crate::domain::{Stock, Symbol};
use crate::error::Result;
use crate::port::{StockCommand, StockQuery};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stock Service
///
/// Owns no transaction logic: every call maps onto one or more store
/// client operations, each in its own transaction.
pub struct StockService {
    client: Arc<StoreClient>,
}

impl StockService {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }

    /// Save a stock, replacing any stock with the same symbol
    ///
    /// Always returns `true` on success; failures surface as errors.
    pub async fn save(&self, stock: &Stock) -> Result<bool> {
        stock.validate()?;
        self.client.save(stock).await?;
        Ok(true)
    }

    /// Save stocks one at a time, each in its own transaction
    ///
    /// Stops at the first failure. Stocks saved before it stay committed.
    pub async fn save_all<'a, I>(&self, stocks: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Stock>,
    {
        for stock in stocks {
            self.save(stock).await?;
        }
        Ok(())
    }

    /// Find the stock with exactly this symbol
    ///
    /// Returns `None` when nothing matches, and also when more than one row
    /// matches: an ambiguous lookup is reported as absent, not as an error.
    pub async fn find_one(&self, symbol: &str) -> Result<Option<Stock>> {
        let mut matches = self
            .client
            .query(&StockQuery::BySymbol(symbol.to_string()))
            .await?;

        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            n => {
                warn!(symbol, matches = n, "Ambiguous stock lookup, treating as absent");
                Ok(None)
            }
        }
    }

    /// All stocks, in store order; empty when the store is empty
    pub async fn find_all(&self) -> Result<Vec<Stock>> {
        self.client.query(&StockQuery::All).await
    }

    /// Delete one stock by symbol
    ///
    /// Fails with `AppError::NotFound` if it does not exist.
    pub async fn delete(&self, symbol: &str) -> Result<()> {
        self.client.delete(symbol).await
    }

    /// Delete every listed stock in a single transaction
    ///
    /// Duplicate symbols are collapsed and unknown symbols are ignored.
    /// Returns the number of stocks removed. An empty list is a no-op
    /// that never reaches the store.
    pub async fn delete_all<I, S>(&self, symbols: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<Symbol> = symbols
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();

        if unique.is_empty() {
            debug!("Batch delete with no symbols, nothing to do");
            return Ok(0);
        }

        let requested = unique.len();
        let command = StockCommand::DeleteBySymbols(unique.into_iter().collect());
        let removed = self.client.execute(&command).await?;

        info!(requested, removed, "Batch delete committed");
        Ok(removed)
    }
}
