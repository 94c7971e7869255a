// Transaction port for atomic operations

use crate::domain::{Bid, Task, TaskId};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional access to the task/bid stores
#[async_trait]
pub trait TransactionalMarketRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin(&self) -> Result<Box<dyn MarketTransaction>>;
}

/// Store operations within a transaction
///
/// A task plus its bids forms one aggregate: every mutation of the pair
/// (bid insert, cascade delete) runs inside a single transaction so that a
/// submit racing an expiry sweep can never orphan a bid or observe a
/// half-deleted task.
#[async_trait]
pub trait MarketTransaction: Transaction {
    /// Find task by ID (within transaction)
    async fn find_task(&mut self, id: &TaskId) -> Result<Option<Task>>;

    /// Insert bid (within transaction)
    async fn insert_bid(&mut self, bid: &Bid) -> Result<()>;

    /// All bids for a task, in submission order (within transaction)
    async fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>>;

    /// Delete a task and all of its bids (within transaction)
    ///
    /// Returns true if the task existed.
    async fn delete_task_with_bids(&mut self, task_id: &TaskId) -> Result<bool>;
}
