// Port Layer - Interfaces for external dependencies

pub mod bid_repository;
pub mod id_provider;
pub mod task_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use bid_repository::BidRepository;
pub use id_provider::IdProvider;
pub use task_repository::TaskRepository;
pub use time_provider::TimeProvider;
pub use transaction::{MarketTransaction, Transaction, TransactionalMarketRepository};
