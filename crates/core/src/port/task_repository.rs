// Task Repository Port (Interface)

use crate::domain::{Task, TaskId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Find task by ID
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>>;

    /// List all tasks in creation order
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// IDs of tasks whose deadline has passed
    async fn find_expired(&self, now_millis: i64) -> Result<Vec<TaskId>>;
}
