// Domain Layer - Pure business entities

pub mod error;
pub mod stock;

// Re-exports
pub use error::DomainError;
pub use stock::{Stock, Symbol};
