// SQLite Session Implementation (one transaction per session)

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use std::str::FromStr;
use stockdal_core::domain::Stock;
use stockdal_core::error::{AppError, Result};
use stockdal_core::port::{StockCommand, StockQuery, StockSession, Transaction};

/// Symbols bound per `IN (...)` statement; larger batches are split
/// across several statements inside the same transaction
const MAX_SYMBOLS_PER_STATEMENT: usize = 500;

/// Dropping the session without commit rolls the transaction back
/// and returns the connection to the pool.
pub struct SqliteStockSession {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteStockSession {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteStockSession {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl StockSession for SqliteStockSession {
    async fn query(&mut self, query: &StockQuery) -> Result<Vec<Stock>> {
        let rows: Vec<StockRow> = match query {
            StockQuery::All => {
                sqlx::query_as::<_, StockRow>("SELECT symbol, price, quantity FROM stocks")
                    .fetch_all(&mut *self.tx)
                    .await
            }
            StockQuery::BySymbol(symbol) => {
                sqlx::query_as::<_, StockRow>(
                    "SELECT symbol, price, quantity FROM stocks WHERE symbol = ?",
                )
                .bind(symbol)
                .fetch_all(&mut *self.tx)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(StockRow::into_stock).collect()
    }

    async fn execute(&mut self, command: &StockCommand) -> Result<u64> {
        match command {
            StockCommand::DeleteBySymbols(symbols) => {
                if symbols.is_empty() {
                    return Err(AppError::Validation(
                        "DeleteBySymbols requires at least one symbol".to_string(),
                    ));
                }

                let mut removed = 0;
                for chunk in symbols.chunks(MAX_SYMBOLS_PER_STATEMENT) {
                    let placeholders = vec!["?"; chunk.len()].join(", ");
                    let sql = format!("DELETE FROM stocks WHERE symbol IN ({})", placeholders);

                    let mut statement = sqlx::query(&sql);
                    for symbol in chunk {
                        statement = statement.bind(symbol);
                    }

                    let result = statement
                        .execute(&mut *self.tx)
                        .await
                        .map_err(map_sqlx_error)?;
                    removed += result.rows_affected();
                }
                Ok(removed)
            }
        }
    }

    async fn save(&mut self, stock: &Stock) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stocks (symbol, price, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT(symbol) DO UPDATE
            SET price = excluded.price, quantity = excluded.quantity
            "#,
        )
        .bind(&stock.symbol)
        .bind(stock.price.to_string())
        .bind(stock.quantity)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn load(&mut self, symbol: &str) -> Result<Option<Stock>> {
        let row: Option<StockRow> =
            sqlx::query_as("SELECT symbol, price, quantity FROM stocks WHERE symbol = ?")
                .bind(symbol)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        row.map(StockRow::into_stock).transpose()
    }

    async fn delete(&mut self, stock: &Stock) -> Result<()> {
        let result = sqlx::query("DELETE FROM stocks WHERE symbol = ?")
            .bind(&stock.symbol)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Stock {}", stock.symbol)));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    symbol: String,
    price: String, // Decimal as text
    quantity: i64,
}

impl StockRow {
    fn into_stock(self) -> Result<Stock> {
        let price = Decimal::from_str(&self.price).map_err(|e| {
            AppError::Database(format!(
                "Corrupt price {:?} for stock {}: {}",
                self.price, self.symbol, e
            ))
        })?;

        Ok(Stock {
            symbol: self.symbol,
            price,
            quantity: self.quantity,
        })
    }
}
