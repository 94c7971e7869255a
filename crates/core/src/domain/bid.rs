// Bid Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};
use crate::domain::task::TaskId;

/// Bid ID (UUID v4)
pub type BidId = String;

/// Bid Entity
///
/// An offer submitted against a single task. Never mutated after creation;
/// deleted only as a cascade when its parent task is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub task_id: TaskId,
    pub bidder: String,
    /// Offered price, non-negative.
    pub price: f64,
    /// Promised completion duration. Unit-agnostic, positive.
    pub completion_time: i64,
    /// Submission timestamp in epoch ms (injected, not system time).
    pub submitted_at: i64,
}

impl Bid {
    /// Create a new Bid, validating its fields.
    ///
    /// Parent-task existence is not checked here; that is the bidding
    /// service's job, inside the same transaction that persists the bid.
    pub fn new(
        id: impl Into<String>,
        task_id: impl Into<String>,
        bidder: impl Into<String>,
        price: f64,
        completion_time: i64,
        submitted_at: i64,
    ) -> Result<Self> {
        let bidder = bidder.into();

        if bidder.trim().is_empty() {
            return Err(DomainError::EmptyField("bidder"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::InvalidPrice(price));
        }
        if completion_time <= 0 {
            return Err(DomainError::InvalidCompletionTime(completion_time));
        }

        Ok(Self {
            id: id.into(),
            task_id: task_id.into(),
            bidder,
            price,
            completion_time,
            submitted_at,
        })
    }
}
