// Taskbid Infrastructure - SQLite Adapter
// Implements: TaskRepository, BidRepository, TransactionalMarketRepository

mod connection;
mod market_repository;
mod migration;
mod transaction;

pub use connection::create_pool;
pub use market_repository::SqliteMarketRepository;
pub use migration::run_migrations;
pub use transaction::SqliteMarketTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
