//! Taskbid Daemon - Main Entry Point
//!
//! Composition root: wires the SQLite stores, the bidding service, the
//! JSON-RPC server and the background expiry sweeper.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskbid_api_rpc::{RpcServer, RpcServerConfig};
use taskbid_core::application::bidding::BiddingService;
use taskbid_core::application::expiry::{ExpirySweeper, DEFAULT_SWEEP_INTERVAL_SECS};
use taskbid_core::port::id_provider::UuidProvider;
use taskbid_core::port::time_provider::SystemTimeProvider;
use taskbid_infra_sqlite::{create_pool, run_migrations, SqliteMarketRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.taskbid/market.db";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("TASKBID_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("taskbid=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Taskbid daemon v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("TASKBID_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_port: u16 = std::env::var("TASKBID_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9620);

    let sweep_interval_secs: u64 = std::env::var("TASKBID_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let repository = Arc::new(SqliteMarketRepository::new(pool.clone()));
    let service = Arc::new(BiddingService::new(
        repository.clone(),
        repository.clone(),
        repository,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_server = RpcServer::new(rpc_config, service.clone());
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start expiry sweeper
    info!("Starting expiry sweeper...");
    let sweeper = ExpirySweeper::new(service, sweep_interval_secs);
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run().await;
    });

    info!("System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    sweeper_handle.abort();

    info!("Shutdown complete.");

    Ok(())
}
