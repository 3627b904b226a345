//! # Ledger Events
//!
//! Defines every notification the ledger publishes after a successful mutation.

use serde::{Deserialize, Serialize};
use shared_types::{BatchId, BatchStatus, Principal, Role};

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    // =========================================================================
    // BATCH REGISTRY
    // =========================================================================
    /// A producer registered a new batch.
    BatchCreated {
        id: BatchId,
        name: String,
        /// Occurrence count of `name` at creation (the `_N` in `Wagyu_N`).
        name_sequence: u64,
        producer: Principal,
    },

    // =========================================================================
    // LIFECYCLE
    // =========================================================================
    /// A batch moved to a new status.
    StatusChanged { id: BatchId, new_status: BatchStatus },

    /// A slaughterhouse recorded slaughter. `attested_halal` is advisory only;
    /// the halal authority makes the final determination.
    SlaughterRecorded { id: BatchId, attested_halal: bool },

    // =========================================================================
    // CERTIFICATION
    // =========================================================================
    /// The halal authority issued (or refused) certification.
    CertificateIssued {
        id: BatchId,
        hash: String,
        is_halal: bool,
    },

    // =========================================================================
    // CUSTODY
    // =========================================================================
    /// Custody of a batch passed between principals.
    OwnershipTransferred {
        id: BatchId,
        from: Principal,
        to: Principal,
    },

    // =========================================================================
    // ROLES
    // =========================================================================
    /// The administrator granted a role (possibly one already held).
    RoleGranted { principal: Principal, role: Role },

    /// The administrator revoked a role (possibly one not held).
    RoleRevoked { principal: Principal, role: Role },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BatchCreated { .. } => EventTopic::Registry,
            Self::StatusChanged { .. } | Self::SlaughterRecorded { .. } => EventTopic::Lifecycle,
            Self::CertificateIssued { .. } => EventTopic::Certification,
            Self::OwnershipTransferred { .. } => EventTopic::Custody,
            Self::RoleGranted { .. } | Self::RoleRevoked { .. } => EventTopic::Roles,
        }
    }

    /// The batch this event concerns, if any.
    #[must_use]
    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            Self::BatchCreated { id, .. }
            | Self::StatusChanged { id, .. }
            | Self::SlaughterRecorded { id, .. }
            | Self::CertificateIssued { id, .. }
            | Self::OwnershipTransferred { id, .. } => Some(*id),
            Self::RoleGranted { .. } | Self::RoleRevoked { .. } => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Batch creation.
    Registry,
    /// Status changes and slaughter records.
    Lifecycle,
    /// Certificates.
    Certification,
    /// Ownership transfers.
    Custody,
    /// Role grants and revocations.
    Roles,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Batches to include. Empty means all batches; role events never match
    /// a non-empty batch list.
    pub batches: Vec<BatchId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            batches: Vec::new(),
        }
    }

    /// Create a filter for events about specific batches.
    #[must_use]
    pub fn for_batches(batches: Vec<BatchId>) -> Self {
        Self {
            topics: Vec::new(),
            batches,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let batch_match = self.batches.is_empty()
            || event
                .batch_id()
                .is_some_and(|id| self.batches.contains(&id));

        topic_match && batch_match
    }
}
