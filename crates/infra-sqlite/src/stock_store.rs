// SQLite StockStore Implementation

use crate::error::map_sqlx_error;
use crate::SqliteStockSession;
use async_trait::async_trait;
use sqlx::SqlitePool;
use stockdal_core::error::Result;
use stockdal_core::port::{StockSession, StockStore};

/// Session factory backed by a SQLite connection pool
#[derive(Clone)]
pub struct SqliteStockStore {
    pool: SqlitePool,
}

impl SqliteStockStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockStore for SqliteStockStore {
    async fn begin(&self) -> Result<Box<dyn StockSession>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteStockSession::new(tx)))
    }
}
