//! # Halal-Chain Node Runtime
//!
//! The main entry point for the Halal-Chain ledger node.
//!
//! With `HC_SCRIPT` set, the node replays that command script, prints a JSON
//! snapshot of the ledger and exits. Otherwise it runs until Ctrl+C.

use anyhow::{Context, Result};
use tracing::{info, warn};

use node_runtime::container::NodeConfig;
use node_runtime::{logging, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = NodeConfig::from_env().context("Invalid configuration")?;

    // Initialize logging
    logging::init(&config.logging)?;

    // Validate for production
    if let Err(e) = config.validate_for_production() {
        warn!("{}", e);
    }

    let script = config.script.path.clone();
    let runtime = NodeRuntime::new(config);
    runtime.start();

    if let Some(path) = script {
        // Shuts down even if replay fails
        let snapshot = runtime.run_script(&path).await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    info!("Ledger is running. Press Ctrl+C to stop.");
    let signal = tokio::signal::ctrl_c().await;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(signal?)
}
