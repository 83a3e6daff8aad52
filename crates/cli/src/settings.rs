//! Layered configuration: defaults, then `stockdal.toml`, then `STOCKDAL_*` env vars

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use stockdal_core::application::RetryPolicy;
use stockdal_infra_sqlite::SqliteSettings;

const DEFAULT_DATABASE_URL: &str = "~/.stockdal/stocks.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub busy_timeout_ms: u64,
    pub retry_backoff_ms: u64,
    /// Unset = retry pool exhaustion forever
    #[serde(default)]
    pub retry_max_attempts: Option<u32>,
    pub retry_writes: bool,
    pub log_format: String,
}

impl Settings {
    /// Load settings
    ///
    /// `config_file` replaces the optional `./stockdal.toml` and must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("max_connections", 10)?
            .set_default("acquire_timeout_ms", 5_000)?
            .set_default("busy_timeout_ms", 5_000)?
            .set_default("retry_backoff_ms", 250)?
            .set_default("retry_writes", false)?
            .set_default("log_format", "pretty")?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("stockdal").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("STOCKDAL").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Database URL with a leading `~` expanded
    pub fn database_url(&self) -> String {
        shellexpand::tilde(&self.database_url).into_owned()
    }

    pub fn sqlite_settings(&self) -> SqliteSettings {
        SqliteSettings {
            database_url: self.database_url(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(self.retry_backoff_ms))
            .with_max_attempts(self.retry_max_attempts)
            .with_retry_writes(self.retry_writes)
    }
}
