//! # Audit Handler
//!
//! Observes every ledger notification on the bus and keeps a running tally,
//! the way an external indexer or UI would.
//!
//! ## Flow
//!
//! 1. Ledger commits an operation and emits its events onto the bus
//! 2. The handler receives them in commit order and logs each one
//! 3. On shutdown it drains whatever is still buffered, then exits

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_bus::{EventTopic, LedgerEvent, Subscription};
use tokio::sync::watch;
use tracing::{debug, info};

/// Running tally of observed notifications.
#[derive(Debug, Default)]
pub struct AuditTrail {
    inner: Mutex<AuditState>,
}

#[derive(Debug, Default)]
struct AuditState {
    events_seen: u64,
    by_topic: HashMap<EventTopic, u64>,
    last: Option<LedgerEvent>,
}

impl AuditTrail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total notifications observed.
    #[must_use]
    pub fn events_seen(&self) -> u64 {
        self.inner.lock().events_seen
    }

    /// Notifications observed on `topic`.
    #[must_use]
    pub fn count(&self, topic: EventTopic) -> u64 {
        self.inner.lock().by_topic.get(&topic).copied().unwrap_or(0)
    }

    /// The most recent notification.
    #[must_use]
    pub fn last_event(&self) -> Option<LedgerEvent> {
        self.inner.lock().last.clone()
    }

    fn record(&self, event: LedgerEvent) {
        let mut state = self.inner.lock();
        state.events_seen += 1;
        *state.by_topic.entry(event.topic()).or_insert(0) += 1;
        state.last = Some(event);
    }
}

/// Handler for ledger notifications.
pub struct AuditHandler {
    /// Subscriber for events.
    subscription: Subscription,
    /// Where observations are tallied.
    trail: Arc<AuditTrail>,
}

impl AuditHandler {
    /// Create a new handler.
    pub fn new(subscription: Subscription, trail: Arc<AuditTrail>) -> Self {
        Self {
            subscription,
            trail,
        }
    }

    /// Run the handler loop until the bus closes or shutdown is signalled.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("[hc-01] Audit handler started");

        loop {
            tokio::select! {
                event = self.subscription.recv() => match event {
                    Some(event) => self.observe(event),
                    None => {
                        info!("[hc-01] Event bus closed");
                        break;
                    }
                },
                _ = shutdown.changed() => {
                    let pending = self.subscription.drain();
                    debug!(pending = pending.len(), "[hc-01] Draining buffered events");
                    for event in pending {
                        self.observe(event);
                    }
                    info!("[hc-01] Shutdown signal received");
                    break;
                }
            }
        }
    }

    fn observe(&self, event: LedgerEvent) {
        match &event {
            LedgerEvent::BatchCreated { id, name, name_sequence, producer } => {
                info!(%id, label = %format!("{name}_{name_sequence}"), %producer, "[hc-01] Batch created");
            }
            LedgerEvent::StatusChanged { id, new_status } => {
                info!(%id, status = new_status.label(), "[hc-01] Status changed");
            }
            LedgerEvent::SlaughterRecorded { id, attested_halal } => {
                info!(%id, attested_halal, "[hc-01] Slaughter recorded");
            }
            LedgerEvent::CertificateIssued { id, hash, is_halal } => {
                info!(%id, hash = %hash, is_halal, "[hc-01] Certificate issued");
            }
            LedgerEvent::OwnershipTransferred { id, from, to } => {
                info!(%id, %from, %to, "[hc-01] Ownership transferred");
            }
            LedgerEvent::RoleGranted { principal, role } => {
                info!(%principal, %role, "[hc-01] Role granted");
            }
            LedgerEvent::RoleRevoked { principal, role } => {
                info!(%principal, %role, "[hc-01] Role revoked");
            }
        }
        self.trail.record(event);
    }
}
