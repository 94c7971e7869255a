// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Deadline must be strictly after creation time: deadline={deadline}, created_at={created_at}")]
    DeadlineNotFuture { deadline: i64, created_at: i64 },

    #[error("Price must be a finite, non-negative number: {0}")]
    InvalidPrice(f64),

    #[error("Completion time must be positive: {0}")]
    InvalidCompletionTime(i64),

    #[error("Unknown criteria: {0}")]
    UnknownCriteria(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
