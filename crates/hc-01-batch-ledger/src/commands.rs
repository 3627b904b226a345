//! # Commands
//!
//! The mutating operation set as data, so scripts and transports can submit
//! operations as JSON:
//!
//! ```json
//! {"op": "certify", "id": 1, "certificate_hash": "Qm123", "is_halal": true}
//! ```
//!
//! Role identifiers stay textual until dispatch so that an unknown role is a
//! ledger `ValidationError` rather than a decode failure.

use crate::domain::LedgerResult;
use crate::ports::inbound::BatchLedgerApi;
use serde::{Deserialize, Serialize};
use shared_types::{BatchId, Principal, Role};

/// One mutating ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    GrantRole {
        role: String,
        principal: Principal,
    },
    RevokeRole {
        role: String,
        principal: Principal,
    },
    CreateBatch {
        name: String,
    },
    RecordSlaughter {
        id: BatchId,
        attested_halal: bool,
    },
    Certify {
        id: BatchId,
        certificate_hash: String,
        is_halal: bool,
    },
    TransferOwnership {
        id: BatchId,
        new_owner: Principal,
    },
    MarkSold {
        id: BatchId,
    },
}

impl LedgerCommand {
    /// Stable name of the operation, as it appears in the `op` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GrantRole { .. } => "grant_role",
            Self::RevokeRole { .. } => "revoke_role",
            Self::CreateBatch { .. } => "create_batch",
            Self::RecordSlaughter { .. } => "record_slaughter",
            Self::Certify { .. } => "certify",
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::MarkSold { .. } => "mark_sold",
        }
    }
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A batch was created.
    Created { id: BatchId },
    /// A role was granted or revoked; `changed` is false for no-ops.
    RoleUpdated { changed: bool },
    /// A lifecycle operation was applied.
    Applied,
}

/// Routes `command` to the matching operation of `ledger`.
///
/// # Errors
///
/// Whatever the operation returns, plus `UnknownRole` for a bad role name.
pub fn dispatch<L: BatchLedgerApi + ?Sized>(
    ledger: &L,
    caller: &Principal,
    command: LedgerCommand,
) -> LedgerResult<CommandOutcome> {
    match command {
        LedgerCommand::GrantRole { role, principal } => {
            let role: Role = role.parse()?;
            let changed = ledger.grant_role(caller, role, principal)?;
            Ok(CommandOutcome::RoleUpdated { changed })
        }
        LedgerCommand::RevokeRole { role, principal } => {
            let role: Role = role.parse()?;
            let changed = ledger.revoke_role(caller, role, principal)?;
            Ok(CommandOutcome::RoleUpdated { changed })
        }
        LedgerCommand::CreateBatch { name } => {
            let id = ledger.create_batch(caller, &name)?;
            Ok(CommandOutcome::Created { id })
        }
        LedgerCommand::RecordSlaughter { id, attested_halal } => {
            ledger.record_slaughter(caller, id, attested_halal)?;
            Ok(CommandOutcome::Applied)
        }
        LedgerCommand::Certify {
            id,
            certificate_hash,
            is_halal,
        } => {
            ledger.certify(caller, id, &certificate_hash, is_halal)?;
            Ok(CommandOutcome::Applied)
        }
        LedgerCommand::TransferOwnership { id, new_owner } => {
            ledger.transfer_ownership(caller, id, new_owner)?;
            Ok(CommandOutcome::Applied)
        }
        LedgerCommand::MarkSold { id } => {
            ledger.mark_sold(caller, id)?;
            Ok(CommandOutcome::Applied)
        }
    }
}
