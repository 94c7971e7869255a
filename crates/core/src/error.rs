// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Every failure path maps to a distinguishable variant; callers can tell
/// "never existed" (`TaskNotFound`) apart from "too late" (`TaskExpired`).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task expired: {0}")]
    TaskExpired(String),

    #[error("No bids submitted for task: {0}")]
    NoBids(String),

    #[error("Unknown criteria on task {task_id}: {criteria}")]
    UnknownCriteria { task_id: String, criteria: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// From implementation for infra crates (to avoid circular dependency)
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Database(err)
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite
// by converting to AppError::Database(String)
