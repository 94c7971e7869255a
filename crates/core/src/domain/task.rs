// Task Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Task ID (UUID v4)
pub type TaskId = String;

/// Winner-selection criteria for a task.
///
/// The recognized set is closed; unknown strings are rejected when a task
/// is created (and again when a stored row is decoded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criteria {
    LowestPrice,
    FastestCompletion,
}

impl Criteria {
    /// Parse the wire/storage form (`lowest_price`, `fastest_completion`).
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "lowest_price" => Ok(Criteria::LowestPrice),
            "fastest_completion" => Ok(Criteria::FastestCompletion),
            other => Err(DomainError::UnknownCriteria(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criteria::LowestPrice => "lowest_price",
            Criteria::FastestCompletion => "fastest_completion",
        }
    }
}

impl std::fmt::Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task Entity
///
/// A unit of work open for bidding. Immutable once created; removal (with
/// its bids) is the only lifecycle transition, performed by the expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Bidding deadline, epoch ms. Always strictly after `created_at`.
    pub deadline: i64,
    pub criteria: Criteria,
    /// Creation timestamp in epoch ms (injected, not system time).
    pub created_at: i64,
}

impl Task {
    /// Create a new Task, validating its invariants.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique task ID (injected, not generated)
    /// * `title` / `description` - Non-empty text
    /// * `deadline` - Epoch ms, must be strictly after `created_at`
    /// * `criteria` - Winner-selection rule
    /// * `created_at` - Creation timestamp in epoch ms (injected)
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: i64,
        criteria: Criteria,
        created_at: i64,
    ) -> Result<Self> {
        let title = title.into();
        let description = description.into();

        if title.trim().is_empty() {
            return Err(DomainError::EmptyField("title"));
        }
        if description.trim().is_empty() {
            return Err(DomainError::EmptyField("description"));
        }
        if deadline <= created_at {
            return Err(DomainError::DeadlineNotFuture {
                deadline,
                created_at,
            });
        }

        Ok(Self {
            id: id.into(),
            title,
            description,
            deadline,
            criteria,
            created_at,
        })
    }

    /// A task is expired once its deadline has passed.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.deadline < now_millis
    }
}
