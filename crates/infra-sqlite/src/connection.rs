// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use stockdal_core::error::{AppError, Result};
use tracing::debug;

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct SqliteSettings {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a checkout may wait before the pool reports exhaustion
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl SqliteSettings {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Create SQLite connection pool with WAL mode
pub async fn create_pool(settings: &SqliteSettings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)
        .map_err(|e| AppError::Config(format!("Invalid database URL: {}", e)))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.busy_timeout)
        .create_if_missing(true);

    debug!(
        max_connections = settings.max_connections,
        acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
        "Opening SQLite pool"
    );

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    Ok(pool)
}
