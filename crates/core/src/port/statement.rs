// Typed statements against the Stock store
//
// Values travel as data, never as query text: adapters must bind them
// as parameters.

use crate::domain::Symbol;

/// Read statement returning Stock rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockQuery {
    /// Every stock, in store order
    All,
    /// Stocks whose symbol equals the given value exactly
    BySymbol(Symbol),
}

/// Write statement returning an affected-row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockCommand {
    /// Delete every stock whose symbol is in the list.
    /// An empty list is not a valid command.
    DeleteBySymbols(Vec<Symbol>),
}
