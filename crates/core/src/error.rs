// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// No connection could be checked out of the pool in time.
    /// The only category the store client treats as transient.
    #[error("No connection currently available: {0}")]
    PoolExhausted(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Backoff wait was cut short by an interrupt signal
    #[error("Interrupted: {0}")]
    Interrupted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// True for failures that may succeed if the same operation is retried later
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::PoolExhausted(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// (orphan rules), see map_sqlx_error there
