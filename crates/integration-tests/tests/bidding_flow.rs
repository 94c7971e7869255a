//! End-to-end bidding flow against the SQLite stores

use std::sync::Arc;

use taskbid_core::application::bidding::{BiddingService, CreateTask, SubmitBid};
use taskbid_core::error::AppError;
use taskbid_core::port::id_provider::UuidProvider;
use taskbid_core::port::time_provider::{SystemTimeProvider, TimeProvider};
use taskbid_infra_sqlite::{create_pool, run_migrations, SqliteMarketRepository};

async fn setup_service() -> BiddingService {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repository = Arc::new(SqliteMarketRepository::new(pool));
    BiddingService::new(
        repository.clone(),
        repository.clone(),
        repository,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    )
}

fn hour_from_now() -> i64 {
    SystemTimeProvider.now_millis() + 3_600_000
}

fn create_req(criteria: &str) -> CreateTask {
    CreateTask {
        title: "Paint fence".to_string(),
        description: "White paint, two coats".to_string(),
        deadline: hour_from_now(),
        criteria: criteria.to_string(),
    }
}

fn bid_req(task_id: &str, bidder: &str, price: f64, completion_time: i64) -> SubmitBid {
    SubmitBid {
        task_id: task_id.to_string(),
        bidder: bidder.to_string(),
        price,
        completion_time,
    }
}

#[tokio::test]
async fn test_lowest_price_scenario() {
    let service = setup_service().await;

    let task = service.create_task(create_req("lowest_price")).await.unwrap();

    service
        .submit_bid(bid_req(&task.id, "A", 50.0, 3))
        .await
        .unwrap();
    service
        .submit_bid(bid_req(&task.id, "B", 40.0, 5))
        .await
        .unwrap();

    let winner = service.evaluate(&task.id).await.unwrap();
    assert_eq!(winner.bidder, "B");
    assert_eq!(winner.price, 40.0);

    // Evaluation is a pure query: asking again gives the same answer
    let again = service.evaluate(&task.id).await.unwrap();
    assert_eq!(again.id, winner.id);
}

#[tokio::test]
async fn test_fastest_completion_scenario() {
    let service = setup_service().await;

    let task = service
        .create_task(create_req("fastest_completion"))
        .await
        .unwrap();

    service
        .submit_bid(bid_req(&task.id, "A", 100.0, 10))
        .await
        .unwrap();
    service
        .submit_bid(bid_req(&task.id, "B", 90.0, 4))
        .await
        .unwrap();

    let winner = service.evaluate(&task.id).await.unwrap();
    assert_eq!(winner.completion_time, 4);
}

#[tokio::test]
async fn test_submit_bid_against_missing_task() {
    let service = setup_service().await;

    let err = service
        .submit_bid(bid_req("999", "A", 10.0, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TaskNotFound(_)));
}

#[tokio::test]
async fn test_evaluate_without_bids() {
    let service = setup_service().await;

    let task = service.create_task(create_req("lowest_price")).await.unwrap();
    let err = service.evaluate(&task.id).await.unwrap_err();
    assert!(matches!(err, AppError::NoBids(_)));
}

#[tokio::test]
async fn test_create_task_validation() {
    let service = setup_service().await;

    // Past deadline
    let err = service
        .create_task(CreateTask {
            title: "t".to_string(),
            description: "d".to_string(),
            deadline: SystemTimeProvider.now_millis() - 1_000,
            criteria: "lowest_price".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));

    // Unknown criteria
    let err = service
        .create_task(CreateTask {
            title: "t".to_string(),
            description: "d".to_string(),
            deadline: hour_from_now(),
            criteria: "cheapest".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));

    // Valid task satisfies created_at <= deadline
    let task = service.create_task(create_req("lowest_price")).await.unwrap();
    assert!(task.created_at <= task.deadline);
}

#[tokio::test]
async fn test_list_tasks_and_bids() {
    let service = setup_service().await;

    let first = service.create_task(create_req("lowest_price")).await.unwrap();
    let second = service
        .create_task(create_req("fastest_completion"))
        .await
        .unwrap();

    let tasks = service.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert!(ids.contains(&first.id.as_str()));
    assert!(ids.contains(&second.id.as_str()));

    service
        .submit_bid(bid_req(&first.id, "A", 50.0, 3))
        .await
        .unwrap();
    service
        .submit_bid(bid_req(&first.id, "B", 40.0, 5))
        .await
        .unwrap();

    let bids = service.list_bids(&first.id).await.unwrap();
    assert_eq!(bids.len(), 2);
    assert!(service.list_bids(&second.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_evaluate_rejects_corrupted_criteria_row() {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let repository = Arc::new(SqliteMarketRepository::new(pool.clone()));
    let service = BiddingService::new(
        repository.clone(),
        repository.clone(),
        repository,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    );

    // A row no running daemon could have written (hand-edited DB, downgrade)
    sqlx::query(
        "INSERT INTO tasks (id, title, description, deadline, criteria, created_at)
         VALUES ('bad', 't', 'd', ?, 'coin_flip', 1000)",
    )
    .bind(hour_from_now())
    .execute(&pool)
    .await
    .unwrap();

    let err = service.evaluate(&"bad".to_string()).await.unwrap_err();
    assert!(matches!(err, AppError::UnknownCriteria { .. }));
}

#[tokio::test]
async fn test_persistence_across_restart() {
    let db_path = format!("/tmp/taskbid_test_persistence_{}.db", uuid::Uuid::new_v4());

    let task_id;
    // Phase 1: create a task and a bid
    {
        let pool = create_pool(&db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let repository = Arc::new(SqliteMarketRepository::new(pool));
        let service = BiddingService::new(
            repository.clone(),
            repository.clone(),
            repository,
            Arc::new(UuidProvider),
            Arc::new(SystemTimeProvider),
        );

        let task = service.create_task(create_req("lowest_price")).await.unwrap();
        service
            .submit_bid(bid_req(&task.id, "A", 25.0, 2))
            .await
            .unwrap();
        task_id = task.id;

        // Simulate daemon shutdown (pool dropped)
    }

    // Phase 2: reopen and verify
    {
        let pool = create_pool(&db_path).await.unwrap();
        // No migrations needed (already applied)

        let repository = Arc::new(SqliteMarketRepository::new(pool));
        let service = BiddingService::new(
            repository.clone(),
            repository.clone(),
            repository,
            Arc::new(UuidProvider),
            Arc::new(SystemTimeProvider),
        );

        let winner = service.evaluate(&task_id).await.unwrap();
        assert_eq!(winner.bidder, "A");
    }

    // Cleanup (WAL sidecar files included)
    let _ = std::fs::remove_file(&db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));
}
