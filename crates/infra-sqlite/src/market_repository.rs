// SQLite Task/Bid Store Implementation

use crate::SqliteMarketTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use taskbid_core::domain::{Bid, Criteria, Task, TaskId};
use taskbid_core::error::{AppError, Result};
use taskbid_core::port::{
    BidRepository, MarketTransaction, TaskRepository, TransactionalMarketRepository,
};

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteMarketRepository {
    pool: SqlitePool,
}

impl SqliteMarketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteMarketRepository {
    async fn insert(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, deadline, criteria, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.criteria.as_str())
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn find_expired(&self, now_millis: i64) -> Result<Vec<TaskId>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM tasks WHERE deadline < ? ORDER BY deadline ASC")
                .bind(now_millis)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(ids)
    }
}

#[async_trait]
impl BidRepository for SqliteMarketRepository {
    async fn find_by_task(&self, task_id: &TaskId) -> Result<Vec<Bid>> {
        let rows: Vec<BidRow> = sqlx::query_as(
            "SELECT * FROM bids WHERE task_id = ? ORDER BY submitted_at ASC, id ASC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BidRow::into_bid).collect())
    }
}

#[async_trait]
impl TransactionalMarketRepository for SqliteMarketRepository {
    async fn begin(&self) -> Result<Box<dyn MarketTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteMarketTransaction::new(tx)))
    }
}

/// SQLite row representation of a task
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TaskRow {
    id: String,
    title: String,
    description: String,
    deadline: i64,
    criteria: String,
    created_at: i64,
}

impl TaskRow {
    /// Decode into the domain entity.
    ///
    /// Criteria strings are re-validated here: a row with an unrecognized
    /// criteria (hand-edited DB, downgrade) surfaces as a distinct error
    /// instead of a silently mis-evaluated task.
    pub(crate) fn into_task(self) -> Result<Task> {
        let criteria =
            Criteria::parse(&self.criteria).map_err(|_| AppError::UnknownCriteria {
                task_id: self.id.clone(),
                criteria: self.criteria.clone(),
            })?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            criteria,
            created_at: self.created_at,
        })
    }
}

/// SQLite row representation of a bid
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BidRow {
    id: String,
    task_id: String,
    bidder: String,
    price: f64,
    completion_time: i64,
    submitted_at: i64,
}

impl BidRow {
    pub(crate) fn into_bid(self) -> Bid {
        Bid {
            id: self.id,
            task_id: self.task_id,
            bidder: self.bidder,
            price: self.price,
            completion_time: self.completion_time,
            submitted_at: self.submitted_at,
        }
    }
}
