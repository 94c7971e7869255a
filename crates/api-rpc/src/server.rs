//! JSON-RPC Server
//!
//! Implements the JSON-RPC 2.0 server over TCP, bound to localhost only.

use crate::handler::RpcHandler;
use crate::types::{
    CreateTaskRequest, EvaluateRequest, ExpireRequest, ListBidsRequest, ListTasksRequest,
    SubmitBidRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use taskbid_core::application::bidding::BiddingService;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9620;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<BiddingService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: only binds to 127.0.0.1 by default (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("task.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateTaskRequest = params.parse()?;
                    handler.create_task(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("task.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListTasksRequest = params.parse()?;
                    handler.list_tasks(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("bid.submit.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SubmitBidRequest = params.parse()?;
                    handler.submit_bid(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("bid.list.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListBidsRequest = params.parse()?;
                    handler.list_bids(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("task.evaluate.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: EvaluateRequest = params.parse()?;
                    handler.evaluate(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.expire.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ExpireRequest = params.parse()?;
                    handler.expire(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
