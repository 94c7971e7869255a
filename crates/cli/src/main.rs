//! Taskbid CLI - Command-line client for the Taskbid daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9620";

#[derive(Parser)]
#[command(name = "taskbid")]
#[command(about = "Taskbid marketplace CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "TASKBID_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task open for bidding
    Create {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long)]
        description: String,

        /// Bidding deadline, UTC ("YYYY-MM-DD HH:MM:SS")
        #[arg(long)]
        deadline: String,

        /// Winner-selection criteria (lowest_price | fastest_completion)
        #[arg(short, long, default_value = "lowest_price")]
        criteria: String,
    },

    /// List all open tasks
    List,

    /// Submit a bid against a task
    Bid {
        /// Task ID
        task_id: String,

        /// Bidder name
        #[arg(short, long)]
        bidder: String,

        /// Offered price
        #[arg(short, long)]
        price: f64,

        /// Promised completion time (unit of your choosing, be consistent)
        #[arg(short = 't', long)]
        completion_time: i64,
    },

    /// List the bids submitted for a task
    Bids {
        /// Task ID
        task_id: String,
    },

    /// Evaluate a task and print the winning bid
    Evaluate {
        /// Task ID
        task_id: String,
    },

    /// Force one expiry sweep now
    Expire,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct TaskRow {
    id: String,
    title: String,
    deadline: String,
    criteria: String,
    created_at: String,
}

#[derive(Deserialize, Tabled)]
struct BidRow {
    id: String,
    bidder: String,
    price: f64,
    completion_time: i64,
    submitted_at: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            title,
            description,
            deadline,
            criteria,
        } => {
            let result = call_rpc(
                &cli.rpc_url,
                "task.create.v1",
                json!({
                    "title": title,
                    "description": description,
                    "deadline": deadline,
                    "criteria": criteria,
                }),
            )
            .await?;

            let task: TaskRow = serde_json::from_value(result)?;
            println!("{}", "Task created".green().bold());
            println!("{}", Table::new(vec![task]));
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "task.list.v1", json!({})).await?;

            let tasks: Vec<TaskRow> = serde_json::from_value(result["tasks"].clone())?;
            if tasks.is_empty() {
                println!("{}", "No open tasks".yellow());
            } else {
                println!("{}", Table::new(tasks));
            }
        }

        Commands::Bid {
            task_id,
            bidder,
            price,
            completion_time,
        } => {
            let result = call_rpc(
                &cli.rpc_url,
                "bid.submit.v1",
                json!({
                    "task_id": task_id,
                    "bidder": bidder,
                    "price": price,
                    "completion_time": completion_time,
                }),
            )
            .await?;

            let bid: BidRow = serde_json::from_value(result)?;
            println!("{}", "Bid submitted".green().bold());
            println!("{}", Table::new(vec![bid]));
        }

        Commands::Bids { task_id } => {
            let result = call_rpc(&cli.rpc_url, "bid.list.v1", json!({ "task_id": task_id }))
                .await?;

            let bids: Vec<BidRow> = serde_json::from_value(result["bids"].clone())?;
            if bids.is_empty() {
                println!("{}", "No bids yet".yellow());
            } else {
                println!("{}", Table::new(bids));
            }
        }

        Commands::Evaluate { task_id } => {
            let result = call_rpc(
                &cli.rpc_url,
                "task.evaluate.v1",
                json!({ "task_id": task_id }),
            )
            .await?;

            let winner: BidRow = serde_json::from_value(result["winner"].clone())?;
            println!("{}", "Winning bid".green().bold());
            println!("{}", Table::new(vec![winner]));
        }

        Commands::Expire => {
            let result = call_rpc(&cli.rpc_url, "admin.expire.v1", json!({})).await?;

            let removed = result["removed"].as_u64().unwrap_or(0);
            println!("Removed {} expired task(s)", removed);
        }
    }

    Ok(())
}
