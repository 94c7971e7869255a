//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results. Timestamps cross the
//! wire as `"YYYY-MM-DD HH:MM:SS"` strings (UTC) and are epoch ms inside.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use taskbid_core::domain::{Bid, Task};
use taskbid_core::error::AppError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a wire timestamp (UTC) into epoch ms
pub fn parse_timestamp(s: &str) -> Result<i64, AppError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc().timestamp_millis())
        .map_err(|e| AppError::Validation(format!("Invalid timestamp '{}': {}", s, e)))
}

/// Format epoch ms as a wire timestamp (UTC)
pub fn format_timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => millis.to_string(), // out of chrono's range, show raw
    }
}

/// task.create.v1 - Create a task open for bidding
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    /// "YYYY-MM-DD HH:MM:SS" (UTC)
    pub deadline: String,
    /// `lowest_price` | `fastest_completion`
    pub criteria: String,
}

/// task.list.v1 - List all tasks
#[derive(Debug, Deserialize)]
pub struct ListTasksRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<TaskView>,
}

/// bid.submit.v1 - Submit a bid against a task
#[derive(Debug, Deserialize)]
pub struct SubmitBidRequest {
    pub task_id: String,
    pub bidder: String,
    pub price: f64,
    pub completion_time: i64,
}

/// bid.list.v1 - List bids for a task
#[derive(Debug, Deserialize)]
pub struct ListBidsRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListBidsResponse {
    pub task_id: String,
    pub bids: Vec<BidView>,
}

/// task.evaluate.v1 - Pick the winning bid
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateResponse {
    pub task_id: String,
    pub winner: BidView,
}

/// admin.expire.v1 - Run one expiry sweep now
#[derive(Debug, Deserialize)]
pub struct ExpireRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub removed: u64,
}

/// Wire view of a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub criteria: String,
    pub created_at: String,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: format_timestamp(task.deadline),
            criteria: task.criteria.to_string(),
            created_at: format_timestamp(task.created_at),
        }
    }
}

/// Wire view of a bid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidView {
    pub id: String,
    pub task_id: String,
    pub bidder: String,
    pub price: f64,
    pub completion_time: i64,
    pub submitted_at: String,
}

impl From<&Bid> for BidView {
    fn from(bid: &Bid) -> Self {
        Self {
            id: bid.id.clone(),
            task_id: bid.task_id.clone(),
            bidder: bid.bidder.clone(),
            price: bid.price,
            completion_time: bid.completion_time,
            submitted_at: format_timestamp(bid.submitted_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let millis = parse_timestamp("2026-08-30 12:30:00").unwrap();
        assert_eq!(format_timestamp(millis), "2026-08-30 12:30:00");
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        assert!(parse_timestamp("2026-08-30").is_err());
        assert!(parse_timestamp("soon").is_err());
        assert!(parse_timestamp("2026-13-99 25:61:61").is_err());
    }
}
