//! RPC Method Handlers
//!
//! Translates wire payloads into bidding-service calls and maps failures to
//! JSON-RPC error codes.

use crate::error::{code, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    parse_timestamp, BidView, CreateTaskRequest, EvaluateRequest, EvaluateResponse, ExpireRequest,
    ExpireResponse, ListBidsRequest, ListBidsResponse, ListTasksRequest, ListTasksResponse,
    SubmitBidRequest, TaskView,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use taskbid_core::application::bidding::{BiddingService, CreateTask, SubmitBid};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<BiddingService>,
    rate_limiter: RateLimiter,
}

impl RpcHandler {
    pub fn new(service: Arc<BiddingService>) -> Self {
        // Default: 200 burst, 100 req/sec (configurable via env)
        let max_burst: u32 = std::env::var("TASKBID_RATE_LIMIT_BURST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);

        let rate_per_sec: u32 = std::env::var("TASKBID_RATE_LIMIT_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self::with_limits(service, max_burst, rate_per_sec)
    }

    /// Construct with explicit rate limits
    pub fn with_limits(service: Arc<BiddingService>, max_burst: u32, rate_per_sec: u32) -> Self {
        Self {
            service,
            rate_limiter: RateLimiter::new(max_burst, rate_per_sec),
        }
    }

    async fn throttle(&self) -> Result<(), ErrorObjectOwned> {
        if self.rate_limiter.check().await {
            Ok(())
        } else {
            Err(ErrorObjectOwned::owned(
                code::THROTTLED,
                "Rate limit exceeded. Please slow down.",
                None::<()>,
            ))
        }
    }

    /// task.create.v1
    pub async fn create_task(
        &self,
        params: CreateTaskRequest,
    ) -> Result<TaskView, ErrorObjectOwned> {
        self.throttle().await?;

        let deadline = parse_timestamp(&params.deadline).map_err(to_rpc_error)?;

        let task = self
            .service
            .create_task(CreateTask {
                title: params.title,
                description: params.description,
                deadline,
                criteria: params.criteria,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(TaskView::from(&task))
    }

    /// task.list.v1
    pub async fn list_tasks(
        &self,
        _params: ListTasksRequest,
    ) -> Result<ListTasksResponse, ErrorObjectOwned> {
        let tasks = self.service.list_tasks().await.map_err(to_rpc_error)?;

        Ok(ListTasksResponse {
            tasks: tasks.iter().map(TaskView::from).collect(),
        })
    }

    /// bid.submit.v1
    pub async fn submit_bid(
        &self,
        params: SubmitBidRequest,
    ) -> Result<BidView, ErrorObjectOwned> {
        self.throttle().await?;

        let bid = self
            .service
            .submit_bid(SubmitBid {
                task_id: params.task_id,
                bidder: params.bidder,
                price: params.price,
                completion_time: params.completion_time,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(BidView::from(&bid))
    }

    /// bid.list.v1
    pub async fn list_bids(
        &self,
        params: ListBidsRequest,
    ) -> Result<ListBidsResponse, ErrorObjectOwned> {
        let bids = self
            .service
            .list_bids(&params.task_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ListBidsResponse {
            task_id: params.task_id,
            bids: bids.iter().map(BidView::from).collect(),
        })
    }

    /// task.evaluate.v1
    pub async fn evaluate(
        &self,
        params: EvaluateRequest,
    ) -> Result<EvaluateResponse, ErrorObjectOwned> {
        let winner = self
            .service
            .evaluate(&params.task_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(EvaluateResponse {
            task_id: params.task_id,
            winner: BidView::from(&winner),
        })
    }

    /// admin.expire.v1
    pub async fn expire(&self, _params: ExpireRequest) -> Result<ExpireResponse, ErrorObjectOwned> {
        self.throttle().await?;

        let removed = self.service.sweep_expired().await.map_err(to_rpc_error)?;

        Ok(ExpireResponse { removed })
    }
}
