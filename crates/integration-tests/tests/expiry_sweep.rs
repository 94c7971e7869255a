//! Expiry sweep semantics against the SQLite stores
//!
//! Uses a manually advanced clock so deadline passage needs no wall-clock
//! waiting.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use taskbid_core::application::bidding::{BiddingService, CreateTask, SubmitBid};
use taskbid_core::application::expiry::ExpirySweeper;
use taskbid_core::error::AppError;
use taskbid_core::port::id_provider::UuidProvider;
use taskbid_core::port::time_provider::TimeProvider;
use taskbid_infra_sqlite::{create_pool, run_migrations, SqliteMarketRepository};

struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    fn at(now: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(now),
        })
    }

    fn advance(&self, delta: i64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

async fn setup(now: i64) -> (BiddingService, sqlx::SqlitePool, Arc<ManualClock>) {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let clock = ManualClock::at(now);
    let repository = Arc::new(SqliteMarketRepository::new(pool.clone()));
    let service = BiddingService::new(
        repository.clone(),
        repository.clone(),
        repository,
        Arc::new(UuidProvider),
        clock.clone(),
    );
    (service, pool, clock)
}

fn create_req(deadline: i64) -> CreateTask {
    CreateTask {
        title: "Clear gutters".to_string(),
        description: "Front and back".to_string(),
        deadline,
        criteria: "lowest_price".to_string(),
    }
}

fn bid_req(task_id: &str, bidder: &str) -> SubmitBid {
    SubmitBid {
        task_id: task_id.to_string(),
        bidder: bidder.to_string(),
        price: 10.0,
        completion_time: 2,
    }
}

async fn orphaned_bids(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bids WHERE task_id NOT IN (SELECT id FROM tasks)")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_sweep_removes_expired_task_and_bids() {
    let (service, pool, clock) = setup(1_000).await;

    // Deadline one second out
    let task = service.create_task(create_req(2_000)).await.unwrap();
    service.submit_bid(bid_req(&task.id, "A")).await.unwrap();
    service.submit_bid(bid_req(&task.id, "B")).await.unwrap();

    // Two seconds pass
    clock.advance(2_000);

    let removed = service.sweep_expired().await.unwrap();
    assert_eq!(removed, 1);

    assert!(service.list_tasks().await.unwrap().is_empty());
    let bids: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bids")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bids, 0);
    assert_eq!(orphaned_bids(&pool).await, 0);
}

#[tokio::test]
async fn test_expired_but_unswept_task_rejects_bids() {
    let (service, _pool, clock) = setup(1_000).await;

    let task = service.create_task(create_req(2_000)).await.unwrap();

    clock.advance(1_500); // past deadline, sweep has not run

    let err = service.submit_bid(bid_req(&task.id, "late")).await.unwrap_err();
    assert!(matches!(err, AppError::TaskExpired(_)));

    // Task is distinguishable from one that never existed until swept
    assert!(service.evaluate(&task.id).await.is_err());
    service.sweep_expired().await.unwrap();

    let err = service.submit_bid(bid_req(&task.id, "later")).await.unwrap_err();
    assert!(matches!(err, AppError::TaskNotFound(_)));
}

#[tokio::test]
async fn test_sweep_spares_unexpired_tasks() {
    let (service, pool, clock) = setup(1_000).await;

    let expiring = service.create_task(create_req(2_000)).await.unwrap();
    let surviving = service.create_task(create_req(100_000)).await.unwrap();
    service
        .submit_bid(bid_req(&surviving.id, "keeper"))
        .await
        .unwrap();

    clock.advance(5_000);

    let removed = service.sweep_expired().await.unwrap();
    assert_eq!(removed, 1);

    let tasks = service.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, surviving.id);
    assert!(!tasks.iter().any(|t| t.id == expiring.id));

    let winner = service.evaluate(&surviving.id).await.unwrap();
    assert_eq!(winner.bidder, "keeper");
    assert_eq!(orphaned_bids(&pool).await, 0);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let (service, _pool, clock) = setup(1_000).await;

    service.create_task(create_req(2_000)).await.unwrap();
    clock.advance(5_000);

    assert_eq!(service.sweep_expired().await.unwrap(), 1);
    assert_eq!(service.sweep_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_manual_trigger_through_sweeper() {
    let (service, _pool, clock) = setup(1_000).await;
    let service = Arc::new(service);

    service.create_task(create_req(2_000)).await.unwrap();
    service.create_task(create_req(3_000)).await.unwrap();
    clock.advance(10_000);

    let sweeper = ExpirySweeper::new(service.clone(), 60);
    let removed = sweeper.run_now().await.unwrap();
    assert_eq!(removed, 2);
    assert!(service.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deadline_boundary() {
    // deadline == now is not yet expired; bids are still accepted
    let (service, _pool, clock) = setup(1_000).await;

    let task = service.create_task(create_req(2_000)).await.unwrap();
    clock.advance(1_000); // now == deadline

    assert!(service.submit_bid(bid_req(&task.id, "edge")).await.is_ok());
    assert_eq!(service.sweep_expired().await.unwrap(), 0);

    clock.advance(1); // now > deadline
    assert!(matches!(
        service.submit_bid(bid_req(&task.id, "late")).await.unwrap_err(),
        AppError::TaskExpired(_)
    ));
    assert_eq!(service.sweep_expired().await.unwrap(), 1);
}
