//! # Batch Ledger Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Tracks product batches through the halal custody chain (producer →
//! slaughterhouse → halal authority → distributor → retailer → consumer) and
//! keeps a permanent, append-only record of every status change,
//! certification and ownership transfer.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Batch ids are contiguous from 1, never reused | `domain/ledger.rs` - `Vec` index |
//! | Per-name sequences are exactly `1..=k` | `domain/name_index.rs` - `reserve_sequence()` |
//! | `(name, sequence)` maps to one id, written once | `domain/name_index.rs` |
//! | Status only moves along the transition graph | `domain/transitions.rs`, `service.rs` |
//! | `Rejected` and `Sold` are terminal | `domain/transitions.rs` - `accepted_statuses()` |
//! | History entries are never edited or removed | `domain/history.rs` - push-only |
//! | Rejected operations leave no trace | `service.rs` - `commit()` |
//!
//! ## State Machine
//!
//! ```text
//! [Created] ──record_slaughter──→ [PendingCertification] ──certify(halal)──→ [CertifiedHalal]
//!                                          │                                      │
//!                                          └──certify(not halal)──→ [Rejected]    │
//!                                                                                 ↓
//! [Sold] ←──mark_sold── [AtRetailer] ←──transfer(retailer)── [InTransit] ←──transfer(distributor)
//! ```
//!
//! ## Error Kinds
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | Authorization | Caller lacks a role, is not the owner/admin, or the recipient lacks the next role |
//! | State | Operation is not an outgoing edge of the current status |
//! | NotFound | Unknown batch id or `(name, sequence)` |
//! | Validation | Empty/oversized name or certificate hash, unknown role, malformed label |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - bus sink, manual clock, recording sink             │
//! │  service.rs - TransitionEngine                                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - BatchLedgerApi trait                       │
//! │  ports/outbound.rs - TimeSource, LedgerEventSink traits         │
//! │  commands.rs       - LedgerCommand, dispatch                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/roles.rs       - RoleRegistry                           │
//! │  domain/name_index.rs  - NameIndex                              │
//! │  domain/ledger.rs      - BatchLedger                            │
//! │  domain/history.rs     - HistoryLogs                            │
//! │  domain/transitions.rs - transition graph                       │
//! │  domain/errors.rs      - LedgerError, ErrorKind                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hc_01_batch_ledger::prelude::*;
//!
//! let ledger = TransitionEngine::in_memory(admin);
//! ledger.grant_role(&admin, Role::Producer, producer)?;
//! let id = ledger.create_batch(&producer, "Wagyu")?;
//! assert_eq!(ledger.get_batch_by_label("Wagyu_1")?.id(), id);
//! ```

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod proptests;

pub use adapters::{BusEventSink, ManualClock, RecordingSink};
pub use commands::{dispatch, CommandOutcome, LedgerCommand};
pub use domain::*;
pub use ports::*;
pub use service::{LedgerConfig, LedgerStats, TransitionEngine};

/// Everything a caller of the ledger usually needs.
pub mod prelude {
    pub use crate::commands::{CommandOutcome, LedgerCommand};
    pub use crate::domain::{Batch, ErrorKind, LedgerError, LedgerResult, Persona};
    pub use crate::ports::inbound::BatchLedgerApi;
    pub use crate::service::{LedgerConfig, TransitionEngine};
    pub use shared_types::{AuthenticatedRequest, BatchId, BatchStatus, Principal, Role};
}
