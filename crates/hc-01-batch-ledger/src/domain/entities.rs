//! # Domain Entities
//!
//! The batch record and the three kinds of history entry.

use serde::{Deserialize, Serialize};
use shared_types::{BatchId, BatchStatus, Principal, Timestamp};

/// One unit of tracked product.
///
/// Fields are private: the identity fields (`id`, `name`, `name_sequence`,
/// `producer`) never change after creation, and the mutable ones are only
/// written by the transition engine through crate-private setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    id: BatchId,
    name: String,
    name_sequence: u64,
    producer: Principal,
    /// `None` once the batch has been sold and custody relinquished.
    current_owner: Option<Principal>,
    status: BatchStatus,
    /// Empty until the first certification.
    certificate_hash: String,
    /// Advisory flag from the slaughterhouse. Not authoritative.
    slaughter_attestation: Option<bool>,
    created_at: Timestamp,
}

impl Batch {
    pub(crate) fn new(
        id: BatchId,
        name: String,
        name_sequence: u64,
        producer: Principal,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            name_sequence,
            producer,
            current_owner: Some(producer),
            status: BatchStatus::Created,
            certificate_hash: String::new(),
            slaughter_attestation: None,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> BatchId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn name_sequence(&self) -> u64 {
        self.name_sequence
    }

    #[must_use]
    pub fn producer(&self) -> Principal {
        self.producer
    }

    #[must_use]
    pub fn current_owner(&self) -> Option<Principal> {
        self.current_owner
    }

    #[must_use]
    pub fn status(&self) -> BatchStatus {
        self.status
    }

    #[must_use]
    pub fn certificate_hash(&self) -> &str {
        &self.certificate_hash
    }

    #[must_use]
    pub fn slaughter_attestation(&self) -> Option<bool> {
        self.slaughter_attestation
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Human-readable label, e.g. `Wagyu_2`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}_{}", self.name, self.name_sequence)
    }

    /// True if `principal` currently has custody. Always false once sold.
    #[must_use]
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.current_owner.as_ref() == Some(principal)
    }

    pub(crate) fn set_status(&mut self, status: BatchStatus) {
        self.status = status;
    }

    pub(crate) fn set_owner(&mut self, owner: Option<Principal>) {
        self.current_owner = owner;
    }

    pub(crate) fn set_certificate_hash(&mut self, hash: String) {
        self.certificate_hash = hash;
    }

    pub(crate) fn set_slaughter_attestation(&mut self, attested_halal: bool) {
        self.slaughter_attestation = Some(attested_halal);
    }
}

/// One entry of a batch's status history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: BatchStatus,
    pub changed_at: Timestamp,
}

/// One entry of a batch's certificate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Content identifier of the externally stored certificate document.
    pub certificate_hash: String,
    pub is_halal: bool,
    pub certified_at: Timestamp,
}

/// One entry of a batch's transfer history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: Principal,
    pub to: Principal,
    pub transferred_at: Timestamp,
}
