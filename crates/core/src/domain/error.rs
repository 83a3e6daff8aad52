// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid stock symbol: {0:?}")]
    InvalidSymbol(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
