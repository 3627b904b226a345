//! # Transition Graph
//!
//! The only legal status edges:
//!
//! ```text
//! Created              --record_slaughter-------------> PendingCertification
//! PendingCertification --certify(halal)---------------> CertifiedHalal
//! PendingCertification --certify(not halal)-----------> Rejected      [terminal]
//! CertifiedHalal       --transfer_ownership(dist.)----> InTransit
//! InTransit            --transfer_ownership(retailer)-> AtRetailer
//! AtRetailer           --mark_sold--------------------> Sold          [terminal]
//! ```
//!
//! This module is pure: it answers "may this operation run from here, and
//! where does it lead". Authorization and storage live elsewhere.

use crate::domain::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{BatchId, BatchStatus, Role};
use std::fmt;

/// A lifecycle operation that moves a batch along the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Slaughterhouse records slaughter.
    RecordSlaughter,
    /// Halal authority certifies or rejects.
    Certify,
    /// Current owner hands custody to the next stage.
    TransferOwnership,
    /// Retailer sells to a consumer.
    MarkSold,
}

impl Operation {
    /// Statuses from which this operation may run.
    #[must_use]
    pub const fn accepted_statuses(self) -> &'static [BatchStatus] {
        match self {
            Operation::RecordSlaughter => &[BatchStatus::Created],
            Operation::Certify => &[BatchStatus::PendingCertification],
            Operation::TransferOwnership => {
                &[BatchStatus::CertifiedHalal, BatchStatus::InTransit]
            }
            Operation::MarkSold => &[BatchStatus::AtRetailer],
        }
    }

    /// Succeeds if `status` is an accepted precondition of this operation.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` otherwise. Terminal statuses accept nothing.
    pub fn check(self, id: BatchId, status: BatchStatus) -> LedgerResult<()> {
        if self.accepted_statuses().contains(&status) {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransition {
                id,
                operation: self,
                status,
            })
        }
    }

    /// Stable textual name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::RecordSlaughter => "record_slaughter",
            Operation::Certify => "certify",
            Operation::TransferOwnership => "transfer_ownership",
            Operation::MarkSold => "mark_sold",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where certification leads.
#[must_use]
pub const fn certification_outcome(is_halal: bool) -> BatchStatus {
    if is_halal {
        BatchStatus::CertifiedHalal
    } else {
        BatchStatus::Rejected
    }
}

/// The role a recipient must hold to take custody from `status`, and the
/// status the batch advances to. `None` outside the custody leg.
#[must_use]
pub const fn custody_step(status: BatchStatus) -> Option<(Role, BatchStatus)> {
    match status {
        BatchStatus::CertifiedHalal => Some((Role::Distributor, BatchStatus::InTransit)),
        BatchStatus::InTransit => Some((Role::Retailer, BatchStatus::AtRetailer)),
        _ => None,
    }
}

/// Direct successors of `status` in the graph.
#[must_use]
pub const fn successors(status: BatchStatus) -> &'static [BatchStatus] {
    match status {
        BatchStatus::Created => &[BatchStatus::PendingCertification],
        BatchStatus::PendingCertification => &[BatchStatus::CertifiedHalal, BatchStatus::Rejected],
        BatchStatus::CertifiedHalal => &[BatchStatus::InTransit],
        BatchStatus::InTransit => &[BatchStatus::AtRetailer],
        BatchStatus::AtRetailer => &[BatchStatus::Sold],
        BatchStatus::Rejected | BatchStatus::Sold => &[],
    }
}

/// True if `from -> to` is an edge of the graph.
#[must_use]
pub fn is_legal_edge(from: BatchStatus, to: BatchStatus) -> bool {
    successors(from).contains(&to)
}
