//! Evaluation Engine - Selects the winning bid for a task
//!
//! Pure and side-effect free: evaluation is a repeatable query. It never
//! closes a task or persists the winner.
//!
//! Selection rule per criteria:
//! - `lowest_price`: minimum `price`
//! - `fastest_completion`: minimum `completion_time`
//!
//! Tie-break, in order: earliest `submitted_at`, then lexicographically
//! smallest bid `id`. The result is therefore independent of input order.

use std::cmp::Ordering;

use thiserror::Error;

use crate::domain::{Bid, Criteria, Task};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("No bids to evaluate")]
    NoBids,
}

/// Pick the winning bid for `task` among `bids`.
///
/// Callers must pass only bids belonging to `task`; the engine asserts
/// this in debug builds but does not filter.
pub fn select_winner(task: &Task, bids: &[Bid]) -> Result<Bid, EvaluationError> {
    debug_assert!(
        bids.iter().all(|b| b.task_id == task.id),
        "bid set contains bids for a different task"
    );

    bids.iter()
        .min_by(|a, b| rank(task.criteria, a, b))
        .cloned()
        .ok_or(EvaluationError::NoBids)
}

fn rank(criteria: Criteria, a: &Bid, b: &Bid) -> Ordering {
    let by_metric = match criteria {
        // Prices are validated finite at creation; total_cmp keeps the
        // comparison a total order regardless.
        Criteria::LowestPrice => a.price.total_cmp(&b.price),
        Criteria::FastestCompletion => a.completion_time.cmp(&b.completion_time),
    };

    by_metric
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        .then_with(|| a.id.cmp(&b.id))
}
