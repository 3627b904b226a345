//! # Error Types
//!
//! Every failed precondition maps to exactly one `LedgerError` variant, and
//! every variant maps to exactly one `ErrorKind`. A failed operation leaves
//! no trace in the ledger.

use crate::domain::transitions::Operation;
use shared_types::{BatchId, BatchStatus, Principal, Role, UnknownRoleError};
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The four failure classes a caller has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks a role, or is not the relevant owner/admin.
    Authorization,
    /// The batch status does not satisfy the operation's precondition.
    State,
    /// Referenced batch (or name + sequence) does not exist.
    NotFound,
    /// Malformed input.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::State => "state",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
        })
    }
}

/// Errors returned by ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // =========================================================================
    // AUTHORIZATION
    // =========================================================================
    /// Only the administrator may manage roles.
    #[error("caller {caller} is not the administrator")]
    NotAdmin { caller: Principal },

    /// The caller does not hold the role the operation requires.
    #[error("caller {caller} does not hold the {role} role")]
    MissingRole { caller: Principal, role: Role },

    /// The caller does not have custody of the batch.
    #[error("caller {caller} is not the current owner of batch {id}")]
    NotOwner { id: BatchId, caller: Principal },

    /// The intended new owner cannot take custody at this stage.
    #[error("recipient {recipient} does not hold the {role} role required to take batch {id}")]
    RecipientMissingRole {
        id: BatchId,
        recipient: Principal,
        role: Role,
    },

    // =========================================================================
    // STATE
    // =========================================================================
    /// The operation is not an outgoing edge of the batch's current status.
    #[error("{operation} is not permitted on batch {id} while it is {status}")]
    InvalidTransition {
        id: BatchId,
        operation: Operation,
        status: BatchStatus,
    },

    // =========================================================================
    // NOT FOUND
    // =========================================================================
    /// No batch carries this id.
    #[error("batch {0} not found")]
    BatchNotFound(BatchId),

    /// No batch was created with this name and sequence.
    #[error("no batch named {name:?} with sequence {sequence}")]
    SequenceNotFound { name: String, sequence: u64 },

    // =========================================================================
    // VALIDATION
    // =========================================================================
    /// Batch names must be non-empty.
    #[error("batch name must not be empty")]
    EmptyName,

    /// Batch name exceeds the configured limit.
    #[error("batch name is {len} bytes, limit is {max}")]
    NameTooLong { len: usize, max: usize },

    /// Certification requires a content identifier.
    #[error("certificate hash must not be empty")]
    EmptyCertificateHash,

    /// Certificate hash exceeds the configured limit.
    #[error("certificate hash is {len} bytes, limit is {max}")]
    CertificateHashTooLong { len: usize, max: usize },

    /// The role identifier names none of the five roles.
    #[error(transparent)]
    UnknownRole(#[from] UnknownRoleError),

    /// A label was not of the form `NAME_SEQUENCE`.
    #[error("malformed batch label {0:?}, expected NAME_SEQUENCE")]
    MalformedLabel(String),

    /// The request envelope speaks another protocol version.
    #[error("unsupported request version {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },
}

impl LedgerError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAdmin { .. }
            | Self::MissingRole { .. }
            | Self::NotOwner { .. }
            | Self::RecipientMissingRole { .. } => ErrorKind::Authorization,
            Self::InvalidTransition { .. } => ErrorKind::State,
            Self::BatchNotFound(_) | Self::SequenceNotFound { .. } => ErrorKind::NotFound,
            Self::EmptyName
            | Self::NameTooLong { .. }
            | Self::EmptyCertificateHash
            | Self::CertificateHashTooLong { .. }
            | Self::UnknownRole(_)
            | Self::MalformedLabel(_)
            | Self::UnsupportedVersion { .. } => ErrorKind::Validation,
        }
    }
}
