//! Event bus adapter.
//!
//! Forwards ledger notifications onto the shared bus.

use crate::ports::outbound::LedgerEventSink;
use shared_bus::{EventPublisher, InMemoryEventBus, LedgerEvent};
use std::sync::Arc;

/// Publishes every ledger event to an [`InMemoryEventBus`].
#[derive(Clone)]
pub struct BusEventSink {
    bus: Arc<InMemoryEventBus>,
}

impl BusEventSink {
    #[must_use]
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }

    #[must_use]
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }
}

impl LedgerEventSink for BusEventSink {
    fn emit(&self, event: LedgerEvent) {
        self.bus.publish(event);
    }
}
