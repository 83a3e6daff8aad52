// Stock Domain Model

use super::error::{DomainError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock symbol, the unique identifier of a Stock row
pub type Symbol = String;

/// Stock Entity
///
/// Identified by `symbol`; equality compares every attribute.
/// There is no partial update: a changed stock is saved again as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: Symbol,
    pub price: Decimal,
    pub quantity: i64,
}

impl Stock {
    pub fn new(symbol: impl Into<Symbol>, price: Decimal, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
        }
    }

    /// Reject stocks that could never be found again by symbol
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(DomainError::InvalidSymbol(self.symbol.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {} x{}", self.symbol, self.price, self.quantity)
    }
}
