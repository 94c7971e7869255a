//! Bidding Service - Orchestrates the task/bid lifecycle
//!
//! Enforces the marketplace invariants before delegating to the stores and
//! the evaluation engine:
//! - a bid is only accepted inside the transaction that saw its parent task
//!   alive and unexpired,
//! - evaluation reads the task and its bid set in one transaction, so a
//!   concurrent sweep can never expose a half-deleted aggregate,
//! - expiry removes a task and its bids as one atomic unit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::application::evaluation::{select_winner, EvaluationError};
use crate::domain::{Bid, Criteria, Task, TaskId};
use crate::error::{AppError, Result};
use crate::port::{
    BidRepository, IdProvider, TaskRepository, TimeProvider, Transaction,
    TransactionalMarketRepository,
};

/// Create-task request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    /// Bidding deadline, epoch ms
    pub deadline: i64,
    /// Wire form: `lowest_price` | `fastest_completion`
    pub criteria: String,
}

/// Submit-bid request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitBid {
    pub task_id: TaskId,
    pub bidder: String,
    pub price: f64,
    pub completion_time: i64,
}

/// Bidding service with injected ports
pub struct BiddingService {
    market: Arc<dyn TransactionalMarketRepository>,
    tasks: Arc<dyn TaskRepository>,
    bids: Arc<dyn BidRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl BiddingService {
    pub fn new(
        market: Arc<dyn TransactionalMarketRepository>,
        tasks: Arc<dyn TaskRepository>,
        bids: Arc<dyn BidRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            market,
            tasks,
            bids,
            id_provider,
            time_provider,
        }
    }

    /// Create a new task open for bidding.
    ///
    /// Rejects empty title/description, a deadline not strictly in the
    /// future and unrecognized criteria.
    pub async fn create_task(&self, req: CreateTask) -> Result<Task> {
        let criteria = Criteria::parse(&req.criteria)?;
        let now = self.time_provider.now_millis();
        let id = self.id_provider.generate_id();

        let task = Task::new(id, req.title, req.description, req.deadline, criteria, now)?;
        self.tasks.insert(&task).await?;

        info!(task_id = %task.id, criteria = %task.criteria, deadline = task.deadline, "Task created");
        Ok(task)
    }

    /// Submit a bid against an existing, unexpired task.
    ///
    /// The task check and the bid insert share one transaction: a sweep
    /// deleting the task either happens entirely before (bid rejected with
    /// `TaskNotFound`) or entirely after (bid deleted with the task).
    /// A task past its deadline rejects bids even before the sweep has
    /// removed it (`TaskExpired`).
    pub async fn submit_bid(&self, req: SubmitBid) -> Result<Bid> {
        let now = self.time_provider.now_millis();
        let bid = Bid::new(
            self.id_provider.generate_id(),
            req.task_id,
            req.bidder,
            req.price,
            req.completion_time,
            now,
        )?;

        let mut tx = self.market.begin().await?;

        let task = match tx.find_task(&bid.task_id).await? {
            Some(task) => task,
            None => {
                tx.rollback().await?;
                return Err(AppError::TaskNotFound(bid.task_id));
            }
        };

        if task.is_expired(now) {
            tx.rollback().await?;
            return Err(AppError::TaskExpired(task.id));
        }

        tx.insert_bid(&bid).await?;
        tx.commit().await?;

        info!(bid_id = %bid.id, task_id = %bid.task_id, bidder = %bid.bidder, "Bid submitted");
        Ok(bid)
    }

    /// Evaluate a task: pick the winning bid per its criteria.
    ///
    /// Pure query - repeated calls return the same winner and nothing is
    /// persisted or closed. Task and bids are read in one transaction for a
    /// consistent snapshot of the aggregate.
    pub async fn evaluate(&self, task_id: &TaskId) -> Result<Bid> {
        let mut tx = self.market.begin().await?;

        let task = match tx.find_task(task_id).await? {
            Some(task) => task,
            None => {
                tx.rollback().await?;
                return Err(AppError::TaskNotFound(task_id.clone()));
            }
        };
        let bids = tx.bids_for_task(task_id).await?;
        tx.rollback().await?; // read-only

        select_winner(&task, &bids).map_err(|e| match e {
            EvaluationError::NoBids => AppError::NoBids(task.id),
        })
    }

    /// All tasks, in creation order.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.list_all().await
    }

    /// All bids for a task, in submission order.
    pub async fn list_bids(&self, task_id: &TaskId) -> Result<Vec<Bid>> {
        if self.tasks.find_by_id(task_id).await?.is_none() {
            return Err(AppError::TaskNotFound(task_id.clone()));
        }
        self.bids.find_by_task(task_id).await
    }

    /// One expiry sweep: delete every task past its deadline, cascading to
    /// its bids. Returns the number of tasks removed.
    ///
    /// Each aggregate is deleted in its own transaction; a store failure on
    /// one task is logged and the remaining expired tasks are still
    /// attempted. The whole sweep is not retried before its next scheduled
    /// run.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let now = self.time_provider.now_millis();
        let expired = self.tasks.find_expired(now).await?;

        let mut removed: u64 = 0;
        for task_id in expired {
            match self.delete_aggregate(&task_id).await {
                Ok(true) => {
                    debug!(task_id = %task_id, "Expired task removed");
                    removed += 1;
                }
                // Already gone: another sweep (or a manual trigger) won the race
                Ok(false) => {}
                Err(e) => {
                    warn!(task_id = %task_id, error = ?e, "Failed to remove expired task, continuing sweep");
                }
            }
        }

        Ok(removed)
    }

    async fn delete_aggregate(&self, task_id: &TaskId) -> Result<bool> {
        let mut tx = self.market.begin().await?;
        match tx.delete_task_with_bids(task_id).await {
            Ok(existed) => {
                tx.commit().await?;
                Ok(existed)
            }
            Err(e) => {
                // Best effort; the rollback error (if any) is secondary
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }
}
