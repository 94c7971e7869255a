// Bid Repository Port (Interface)

use crate::domain::{Bid, TaskId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Bid queries
///
/// Bid writes go through `MarketTransaction` only: a bid must never be
/// persisted outside the transaction that verified its parent task.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// All bids for a task, in submission order
    async fn find_by_task(&self, task_id: &TaskId) -> Result<Vec<Bid>>;
}
