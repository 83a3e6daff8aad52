// Application Layer - Store client and Stock use cases

pub mod constants;
pub mod interrupt;
pub mod retry;
pub mod stock_service;
pub mod store_client;

// Re-exports
pub use interrupt::{interrupt_channel, InterruptSender, InterruptToken};
pub use retry::{RetryDecision, RetryPolicy};
pub use stock_service::StockService;
pub use store_client::StoreClient;
