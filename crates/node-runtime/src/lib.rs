//! # Node Runtime Library
//!
//! Hosts one batch ledger and everything around it. The main entry point is
//! the `main.rs` binary; the library is exposed for testing.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the ledger/bus container
//! - `handlers/` - bus observers (audit trail)
//! - `script` - JSON command script replay and ledger snapshots
//! - `logging` - tracing subscriber setup
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Warn if the administrator is unset
//! 3. Create the bus, then the ledger publishing onto it
//! 4. Start the audit handler (spawned async task)
//! 5. Replay the command script, if one is configured
//! 6. Run until Ctrl+C, or exit after replay

#![allow(missing_docs)]

pub mod container;
pub mod handlers;
pub mod logging;
pub mod script;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use hc_01_batch_ledger::BatchLedgerApi;
use shared_bus::EventFilter;

use crate::container::{LedgerContainer, NodeConfig, NodeLedger};
use crate::handlers::{AuditHandler, AuditTrail};
use crate::script::{batch_view, LedgerSnapshot, ReplayReport};

/// How long shutdown waits for handlers to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The node runtime orchestrating the ledger and its observers.
pub struct NodeRuntime {
    /// Ledger container.
    container: Arc<LedgerContainer>,
    /// Audit observations.
    audit: Arc<AuditTrail>,
    /// Spawned handler tasks.
    handles: Mutex<Vec<JoinHandle<()>>>,
    /// Shutdown signal sender.
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create a new node runtime with configuration.
    pub fn new(config: NodeConfig) -> Self {
        info!("Creating Halal-Chain node runtime");

        let container = Arc::new(LedgerContainer::new(config));
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Self {
            container,
            audit: Arc::new(AuditTrail::new()),
            handles: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start the event handlers.
    ///
    /// Must be called from within a Tokio runtime. The audit subscription is
    /// taken before this returns, so every later commit is observed.
    pub fn start(&self) {
        info!("===========================================");
        info!("  Halal-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let handler = AuditHandler::new(
            self.container.bus.subscribe(EventFilter::all()),
            Arc::clone(&self.audit),
        );
        let shutdown = self.shutdown_rx.clone();
        self.handles
            .lock()
            .push(tokio::spawn(async move { handler.run(shutdown).await }));

        info!(admin = %self.container.ledger.admin(), "Ledger ready");
    }

    /// Replays a command script file against the ledger.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the script cannot be loaded. Rejected requests are
    /// reported, not returned as errors.
    pub fn replay_script(&self, path: &Path) -> Result<ReplayReport> {
        info!(path = %path.display(), "Replaying command script");
        let requests = script::load_script(path)?;
        Ok(script::replay(self.container.ledger.as_ref(), requests))
    }

    /// Replays `path`, snapshots the ledger and shuts down, in that order.
    ///
    /// Shutdown runs even when replay fails, so handlers always drain.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the script cannot be loaded or the snapshot fails.
    pub async fn run_script(&self, path: &Path) -> Result<LedgerSnapshot> {
        let outcome = self.replay_script(path).and_then(|report| {
            if !report.rejected.is_empty() {
                warn!(rejected = report.rejected.len(), "Some scripted requests were rejected");
            }
            self.snapshot()
        });
        self.shutdown().await;
        outcome
    }

    /// Snapshot of every batch with its histories.
    ///
    /// Batches and logs are read together, so each view is consistent even
    /// while commits are landing. `stats` is read separately.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a batch has no history, which would mean the ledger
    /// is corrupt.
    pub fn snapshot(&self) -> Result<LedgerSnapshot> {
        let ledger = self.container.ledger.as_ref();
        let batches = ledger
            .all_batches_with_history()?
            .into_iter()
            .map(|(batch, history)| batch_view(batch, &history))
            .collect();
        Ok(LedgerSnapshot {
            admin: ledger.admin(),
            stats: ledger.stats(),
            batches,
        })
    }

    /// Shutdown the node gracefully.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Signal shutdown to all handlers
    /// 2. Wait for them to drain buffered events (with timeout)
    /// 3. Exit
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handles: Vec<_> = self.handles.lock().drain(..).collect();
        for handle in handles {
            match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Handler task failed: {}", e),
                Err(_) => warn!("Handler did not stop within {:?}", SHUTDOWN_GRACE),
            }
        }

        info!(events_audited = self.audit.events_seen(), "Shutdown complete");
    }

    /// The hosted ledger.
    pub fn ledger(&self) -> Arc<NodeLedger> {
        Arc::clone(&self.container.ledger)
    }

    /// Audit observations so far.
    pub fn audit(&self) -> Arc<AuditTrail> {
        Arc::clone(&self.audit)
    }

    /// Get a reference to the ledger container.
    pub fn container(&self) -> Arc<LedgerContainer> {
        Arc::clone(&self.container)
    }
}
