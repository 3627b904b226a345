//! # Ledger Container
//!
//! Holds the ledger instance and the bus it publishes to, with proper
//! lifetime management and dependency injection.

pub mod config;

pub use config::{BusConfig, ConfigError, LedgerSection, LoggingConfig, NodeConfig, ScriptConfig};

use std::sync::Arc;

use hc_01_batch_ledger::{BusEventSink, SystemTimeSource, TransitionEngine};
use shared_bus::InMemoryEventBus;
use tracing::info;

/// Concrete ledger type hosted by the node.
pub type NodeLedger = TransitionEngine<SystemTimeSource, BusEventSink>;

/// Central container holding the ledger and its infrastructure.
pub struct LedgerContainer {
    /// Node configuration.
    pub config: NodeConfig,
    /// Notification bus shared with observers.
    pub bus: Arc<InMemoryEventBus>,
    /// The batch ledger (Subsystem 1).
    pub ledger: Arc<NodeLedger>,
}

impl LedgerContainer {
    /// Builds the bus first, then the ledger publishing onto it.
    #[must_use]
    pub fn new(config: NodeConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.capacity));
        let ledger = Arc::new(TransitionEngine::new(
            config.ledger.admin,
            config.ledger.limits,
            Arc::new(SystemTimeSource),
            Arc::new(BusEventSink::new(Arc::clone(&bus))),
        ));
        info!(
            admin = %config.ledger.admin,
            bus_capacity = config.bus.capacity,
            "Ledger container initialised"
        );
        Self { config, bus, ledger }
    }
}
