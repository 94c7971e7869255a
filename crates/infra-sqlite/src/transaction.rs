// SQLite Transaction Implementation

use crate::market_repository::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use taskbid_core::domain::{Bid, Task, TaskId};
use taskbid_core::error::Result;
use taskbid_core::port::{MarketTransaction, Transaction};

pub struct SqliteMarketTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteMarketTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteMarketTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl MarketTransaction for SqliteMarketTransaction {
    async fn find_task(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let row =
            sqlx::query_as::<_, crate::market_repository::TaskRow>("SELECT * FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        row.map(|r| r.into_task()).transpose()
    }

    async fn insert_bid(&mut self, bid: &Bid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bids (id, task_id, bidder, price, completion_time, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bid.id)
        .bind(&bid.task_id)
        .bind(&bid.bidder)
        .bind(bid.price)
        .bind(bid.completion_time)
        .bind(bid.submitted_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn bids_for_task(&mut self, task_id: &TaskId) -> Result<Vec<Bid>> {
        let rows: Vec<crate::market_repository::BidRow> = sqlx::query_as(
            "SELECT * FROM bids WHERE task_id = ? ORDER BY submitted_at ASC, id ASC",
        )
        .bind(task_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_bid()).collect())
    }

    async fn delete_task_with_bids(&mut self, task_id: &TaskId) -> Result<bool> {
        // Bids first: the task row must never outlive its bids' referent
        sqlx::query("DELETE FROM bids WHERE task_id = ?")
            .bind(task_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
