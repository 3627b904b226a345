//! # Inbound Port - BatchLedgerApi
//!
//! Primary driving port exposing the ledger's operations and queries.
//!
//! ## Authorization
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `grant_role` / `revoke_role` | Administrator |
//! | `create_batch` | Producer |
//! | `record_slaughter` | Slaughterhouse |
//! | `certify` | Halal authority |
//! | `transfer_ownership` | Current owner; recipient must hold the next stage's role |
//! | `mark_sold` | Current owner holding the Retailer role |
//! | queries | Anyone |
//!
//! Mutating methods take `&self`: implementations serialize them internally.
//! Queries return owned snapshots, so a caller can iterate a history as many
//! times as it likes without holding any lock.

use crate::commands::{CommandOutcome, LedgerCommand};
use crate::domain::{
    Batch, CertificateRecord, LedgerError, LedgerResult, Persona, RoleChange, StatusChange,
    TransferRecord,
};
use shared_types::{AuthenticatedRequest, BatchId, Principal, Role};
use std::collections::BTreeSet;

/// Primary API of the batch ledger.
///
/// # Example
///
/// ```rust,ignore
/// let id = ledger.create_batch(&producer, "Wagyu")?;
/// ledger.record_slaughter(&slaughterhouse, id, true)?;
/// ledger.certify(&authority, id, "Qm123", true)?;
/// ledger.transfer_ownership(&producer, id, distributor)?;
/// ```
pub trait BatchLedgerApi: Send + Sync {
    // =========================================================================
    // ROLES
    // =========================================================================

    /// Grants `role` to `principal`. Returns whether membership changed.
    ///
    /// # Errors
    /// - `NotAdmin`: caller is not the administrator
    fn grant_role(&self, caller: &Principal, role: Role, principal: Principal)
        -> LedgerResult<bool>;

    /// Revokes `role` from `principal`. Returns whether membership changed.
    ///
    /// # Errors
    /// - `NotAdmin`: caller is not the administrator
    fn revoke_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> LedgerResult<bool>;

    fn has_role(&self, role: Role, principal: &Principal) -> bool;

    fn is_admin(&self, principal: &Principal) -> bool;

    fn admin(&self) -> Principal;

    fn roles_of(&self, principal: &Principal) -> BTreeSet<Role>;

    fn persona(&self, principal: &Principal) -> Persona;

    /// Every grant and revoke ever applied, oldest first.
    fn role_history(&self) -> Vec<RoleChange>;

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Registers a new batch owned by the caller.
    ///
    /// # Errors
    /// - `MissingRole`: caller is not a producer
    /// - `EmptyName` / `NameTooLong`: bad name
    fn create_batch(&self, caller: &Principal, name: &str) -> LedgerResult<BatchId>;

    /// Moves a batch from `Created` to `PendingCertification`.
    ///
    /// `attested_halal` is stored as advisory input only.
    ///
    /// # Errors
    /// - `MissingRole`: caller is not a slaughterhouse
    /// - `BatchNotFound`: unknown id
    /// - `InvalidTransition`: batch is not `Created`
    fn record_slaughter(
        &self,
        caller: &Principal,
        id: BatchId,
        attested_halal: bool,
    ) -> LedgerResult<()>;

    /// Certifies (or rejects) a batch awaiting certification.
    ///
    /// # Errors
    /// - `MissingRole`: caller is not a halal authority
    /// - `EmptyCertificateHash` / `CertificateHashTooLong`: bad hash
    /// - `BatchNotFound`: unknown id
    /// - `InvalidTransition`: batch is not `PendingCertification`
    fn certify(
        &self,
        caller: &Principal,
        id: BatchId,
        certificate_hash: &str,
        is_halal: bool,
    ) -> LedgerResult<()>;

    /// Hands custody to the next stage of the chain.
    ///
    /// # Errors
    /// - `BatchNotFound`: unknown id
    /// - `NotOwner`: caller does not have custody (checked for every status)
    /// - `InvalidTransition`: batch is neither `CertifiedHalal` nor `InTransit`
    /// - `RecipientMissingRole`: recipient cannot take custody at this stage
    fn transfer_ownership(
        &self,
        caller: &Principal,
        id: BatchId,
        new_owner: Principal,
    ) -> LedgerResult<()>;

    /// Sells a batch and relinquishes custody.
    ///
    /// # Errors
    /// - `MissingRole`: caller is not a retailer
    /// - `BatchNotFound`: unknown id
    /// - `NotOwner`: caller does not have custody
    /// - `InvalidTransition`: batch is not `AtRetailer`
    fn mark_sold(&self, caller: &Principal, id: BatchId) -> LedgerResult<()>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// # Errors
    /// - `BatchNotFound`: unknown id
    fn get_batch(&self, id: BatchId) -> LedgerResult<Batch>;

    /// # Errors
    /// - `SequenceNotFound`: no such `(name, sequence)`
    fn get_batch_by_sequence(&self, name: &str, sequence: u64) -> LedgerResult<Batch>;

    /// Resolves a `NAME_SEQUENCE` label such as `Wagyu_2`.
    ///
    /// # Errors
    /// - `MalformedLabel`: label is not `NAME_SEQUENCE`
    /// - `SequenceNotFound`: no such batch
    fn get_batch_by_label(&self, label: &str) -> LedgerResult<Batch> {
        let (name, sequence) = parse_label(label)?;
        self.get_batch_by_sequence(name, sequence)
    }

    /// # Errors
    /// - `BatchNotFound`: unknown id
    fn status_history(&self, id: BatchId) -> LedgerResult<Vec<StatusChange>>;

    /// # Errors
    /// - `BatchNotFound`: unknown id
    fn certificate_history(&self, id: BatchId) -> LedgerResult<Vec<CertificateRecord>>;

    /// # Errors
    /// - `BatchNotFound`: unknown id
    fn transfer_history(&self, id: BatchId) -> LedgerResult<Vec<TransferRecord>>;

    /// Number of batches ever created; also the highest id.
    fn batch_count(&self) -> u64;

    /// Number of batches created with `name`.
    fn name_count(&self, name: &str) -> u64;

    /// Batches in `principal`'s custody, in id order.
    fn batches_owned_by(&self, principal: &Principal) -> Vec<Batch>;

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Applies one command on behalf of the authenticated caller.
    ///
    /// # Errors
    /// - `UnsupportedVersion`: envelope version not understood
    /// - any error of the dispatched operation
    fn submit(&self, request: AuthenticatedRequest<LedgerCommand>) -> LedgerResult<CommandOutcome>;
}

/// Splits `NAME_SEQUENCE` on its last underscore.
///
/// # Errors
///
/// `MalformedLabel` if there is no underscore, the name part is empty, or the
/// suffix is not a positive decimal integer.
pub fn parse_label(label: &str) -> LedgerResult<(&str, u64)> {
    let malformed = || LedgerError::MalformedLabel(label.to_owned());

    let (name, suffix) = label.rsplit_once('_').ok_or_else(malformed)?;
    if name.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    match suffix.parse::<u64>() {
        Ok(sequence) if sequence > 0 => Ok((name, sequence)),
        _ => Err(malformed()),
    }
}
