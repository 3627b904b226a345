//! # Transition Engine
//!
//! The service every external call enters. For each mutating operation it
//! authorizes the caller, loads the batch, checks the status precondition,
//! then applies the batch mutation and the history appends together.
//!
//! ## Atomicity
//!
//! All state sits behind one `RwLock`. A mutating operation holds the write
//! lock across the whole check-then-apply unit. Every check happens before
//! the first write, and nothing after the first write can fail, so a rejected
//! operation leaves the ledger exactly as it found it. Queries take the read
//! lock and always observe a fully applied state.
//!
//! Notifications are emitted before the write lock is released, so observers
//! see them in commit order.

use crate::commands::{dispatch, CommandOutcome, LedgerCommand};
use crate::domain::transitions::{certification_outcome, custody_step, Operation};
use crate::domain::{
    Batch, BatchHistory, BatchLedger, CertificateRecord, HistoryLogs, LedgerError, LedgerResult,
    Persona, RoleChange, RoleRegistry, StatusChange, TransferRecord,
};
use crate::ports::inbound::BatchLedgerApi;
use crate::ports::outbound::{LedgerEventSink, NoOpSink, SystemTimeSource, TimeSource};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use shared_bus::LedgerEvent;
use shared_types::{AuthenticatedRequest, BatchId, BatchStatus, Principal, Role, Timestamp};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Longest accepted batch name, in bytes.
    pub max_name_bytes: usize,
    /// Longest accepted certificate content identifier, in bytes.
    pub max_certificate_hash_bytes: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_name_bytes: 256,
            max_certificate_hash_bytes: 256,
        }
    }
}

impl LedgerConfig {
    /// # Errors
    ///
    /// `EmptyName` or `NameTooLong`.
    pub fn validate_name(&self, name: &str) -> LedgerResult<()> {
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if name.len() > self.max_name_bytes {
            return Err(LedgerError::NameTooLong {
                len: name.len(),
                max: self.max_name_bytes,
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `EmptyCertificateHash` or `CertificateHashTooLong`.
    pub fn validate_certificate_hash(&self, hash: &str) -> LedgerResult<()> {
        if hash.is_empty() {
            return Err(LedgerError::EmptyCertificateHash);
        }
        if hash.len() > self.max_certificate_hash_bytes {
            return Err(LedgerError::CertificateHashTooLong {
                len: hash.len(),
                max: self.max_certificate_hash_bytes,
            });
        }
        Ok(())
    }
}

/// Statistics for the engine. Telemetry only, not ledger state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Mutating operations that committed.
    pub operations_applied: u64,
    /// Mutating operations that were rejected.
    pub operations_rejected: u64,
    /// Batches created.
    pub batches_created: u64,
    /// Notifications handed to the sink.
    pub events_emitted: u64,
}

struct LedgerState {
    roles: RoleRegistry,
    batches: BatchLedger,
    history: HistoryLogs,
}

/// The batch ledger state machine.
pub struct TransitionEngine<C: TimeSource = SystemTimeSource, E: LedgerEventSink = NoOpSink> {
    config: LedgerConfig,
    state: RwLock<LedgerState>,
    clock: Arc<C>,
    sink: Arc<E>,
    stats: Mutex<LedgerStats>,
}

impl TransitionEngine {
    /// An engine on the system clock that emits nowhere.
    #[must_use]
    pub fn in_memory(admin: Principal) -> Self {
        Self::new(
            admin,
            LedgerConfig::default(),
            Arc::new(SystemTimeSource),
            Arc::new(NoOpSink),
        )
    }
}

impl<C: TimeSource, E: LedgerEventSink> TransitionEngine<C, E> {
    /// Creates an empty ledger. `admin` is fixed for the engine's lifetime.
    pub fn new(admin: Principal, config: LedgerConfig, clock: Arc<C>, sink: Arc<E>) -> Self {
        info!(%admin, "Batch ledger initialised");
        Self {
            config,
            state: RwLock::new(LedgerState {
                roles: RoleRegistry::new(admin),
                batches: BatchLedger::new(),
                history: HistoryLogs::new(),
            }),
            clock,
            sink,
            stats: Mutex::new(LedgerStats::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        *self.stats.lock()
    }

    #[must_use]
    pub fn sink(&self) -> &Arc<E> {
        &self.sink
    }

    /// Every batch, in id order.
    #[must_use]
    pub fn all_batches(&self) -> Vec<Batch> {
        self.state.read().batches.iter().cloned().collect()
    }

    /// Every batch paired with its logs, in id order, read under one guard
    /// so each batch agrees with its history.
    ///
    /// # Errors
    ///
    /// `BatchNotFound` if a batch has no logs, which would mean corrupt state.
    pub fn all_batches_with_history(&self) -> LedgerResult<Vec<(Batch, BatchHistory)>> {
        let state = self.state.read();
        state
            .batches
            .iter()
            .map(|batch| Ok((batch.clone(), state.history.get(batch.id())?.clone())))
            .collect()
    }

    /// Runs `apply` under the write lock and emits its events on success.
    ///
    /// `apply` must perform every check before its first write.
    fn commit<T, F>(&self, operation: &'static str, apply: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerState, Timestamp, &mut Vec<LedgerEvent>) -> LedgerResult<T>,
    {
        let mut state = self.state.write();
        let now = self.clock.now();
        let mut events = Vec::new();

        match apply(&mut *state, now, &mut events) {
            Ok(value) => {
                let emitted = events.len() as u64;
                for event in events {
                    self.sink.emit(event);
                }
                drop(state);

                let mut stats = self.stats.lock();
                stats.operations_applied += 1;
                stats.events_emitted += emitted;
                Ok(value)
            }
            Err(err) => {
                drop(state);
                self.reject(operation, &err);
                Err(err)
            }
        }
    }

    fn reject(&self, operation: &'static str, err: &LedgerError) {
        warn!(operation, kind = %err.kind(), error = %err, "Operation rejected");
        self.stats.lock().operations_rejected += 1;
    }
}

impl<C: TimeSource, E: LedgerEventSink> BatchLedgerApi for TransitionEngine<C, E> {
    #[instrument(skip(self))]
    fn grant_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> LedgerResult<bool> {
        let changed = self.commit("grant_role", |state, now, events| {
            let changed = state.roles.grant_role(caller, role, principal, now)?;
            events.push(LedgerEvent::RoleGranted { principal, role });
            Ok(changed)
        })?;
        info!(%principal, %role, changed, "Role granted");
        Ok(changed)
    }

    #[instrument(skip(self))]
    fn revoke_role(
        &self,
        caller: &Principal,
        role: Role,
        principal: Principal,
    ) -> LedgerResult<bool> {
        let changed = self.commit("revoke_role", |state, now, events| {
            let changed = state.roles.revoke_role(caller, role, principal, now)?;
            events.push(LedgerEvent::RoleRevoked { principal, role });
            Ok(changed)
        })?;
        info!(%principal, %role, changed, "Role revoked");
        Ok(changed)
    }

    fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.state.read().roles.has_role(role, principal)
    }

    fn is_admin(&self, principal: &Principal) -> bool {
        self.state.read().roles.is_admin(principal)
    }

    fn admin(&self) -> Principal {
        self.state.read().roles.admin()
    }

    fn roles_of(&self, principal: &Principal) -> BTreeSet<Role> {
        self.state.read().roles.roles_of(principal)
    }

    fn persona(&self, principal: &Principal) -> Persona {
        self.state.read().roles.persona(principal)
    }

    fn role_history(&self) -> Vec<RoleChange> {
        self.state.read().roles.history().to_vec()
    }

    #[instrument(skip(self))]
    fn create_batch(&self, caller: &Principal, name: &str) -> LedgerResult<BatchId> {
        let config = self.config;
        let (id, sequence) = self.commit("create_batch", |state, now, events| {
            state.roles.require_role(Role::Producer, caller)?;
            config.validate_name(name)?;

            let id = state.batches.create(name, *caller, now)?;
            let sequence = state.batches.get(id)?.name_sequence();
            state
                .history
                .open(id)
                .push_status(BatchStatus::Created, now);

            events.push(LedgerEvent::BatchCreated {
                id,
                name: name.to_owned(),
                name_sequence: sequence,
                producer: *caller,
            });
            Ok((id, sequence))
        })?;

        self.stats.lock().batches_created += 1;
        info!(%id, name, sequence, "Batch created");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn record_slaughter(
        &self,
        caller: &Principal,
        id: BatchId,
        attested_halal: bool,
    ) -> LedgerResult<()> {
        self.commit("record_slaughter", |state, now, events| {
            let LedgerState {
                roles,
                batches,
                history,
            } = state;
            roles.require_role(Role::Slaughterhouse, caller)?;
            let batch = batches.get_mut(id)?;
            Operation::RecordSlaughter.check(id, batch.status())?;
            let log = history.get_mut(id)?;

            let next = BatchStatus::PendingCertification;
            batch.set_slaughter_attestation(attested_halal);
            batch.set_status(next);
            log.push_status(next, now);

            events.push(LedgerEvent::SlaughterRecorded { id, attested_halal });
            events.push(LedgerEvent::StatusChanged {
                id,
                new_status: next,
            });
            Ok(())
        })?;
        info!(%id, attested_halal, "Slaughter recorded");
        Ok(())
    }

    #[instrument(skip(self))]
    fn certify(
        &self,
        caller: &Principal,
        id: BatchId,
        certificate_hash: &str,
        is_halal: bool,
    ) -> LedgerResult<()> {
        let config = self.config;
        let next = self.commit("certify", |state, now, events| {
            let LedgerState {
                roles,
                batches,
                history,
            } = state;
            roles.require_role(Role::HalalAuthority, caller)?;
            config.validate_certificate_hash(certificate_hash)?;
            let batch = batches.get_mut(id)?;
            Operation::Certify.check(id, batch.status())?;
            let log = history.get_mut(id)?;

            let next = certification_outcome(is_halal);
            batch.set_certificate_hash(certificate_hash.to_owned());
            batch.set_status(next);
            log.push_certificate(certificate_hash.to_owned(), is_halal, now);
            log.push_status(next, now);

            events.push(LedgerEvent::CertificateIssued {
                id,
                hash: certificate_hash.to_owned(),
                is_halal,
            });
            events.push(LedgerEvent::StatusChanged {
                id,
                new_status: next,
            });
            Ok(next)
        })?;
        info!(%id, is_halal, status = %next, "Batch certified");
        Ok(())
    }

    #[instrument(skip(self))]
    fn transfer_ownership(
        &self,
        caller: &Principal,
        id: BatchId,
        new_owner: Principal,
    ) -> LedgerResult<()> {
        let next = self.commit("transfer_ownership", |state, now, events| {
            let LedgerState {
                roles,
                batches,
                history,
            } = state;
            let batch = batches.get_mut(id)?;
            if !batch.is_owned_by(caller) {
                return Err(LedgerError::NotOwner {
                    id,
                    caller: *caller,
                });
            }
            let status = batch.status();
            let (required, next) =
                custody_step(status).ok_or(LedgerError::InvalidTransition {
                    id,
                    operation: Operation::TransferOwnership,
                    status,
                })?;
            if !roles.has_role(required, &new_owner) {
                return Err(LedgerError::RecipientMissingRole {
                    id,
                    recipient: new_owner,
                    role: required,
                });
            }
            let log = history.get_mut(id)?;

            batch.set_owner(Some(new_owner));
            batch.set_status(next);
            log.push_transfer(*caller, new_owner, now);
            log.push_status(next, now);

            events.push(LedgerEvent::OwnershipTransferred {
                id,
                from: *caller,
                to: new_owner,
            });
            events.push(LedgerEvent::StatusChanged {
                id,
                new_status: next,
            });
            Ok(next)
        })?;
        info!(%id, to = %new_owner, status = %next, "Ownership transferred");
        Ok(())
    }

    #[instrument(skip(self))]
    fn mark_sold(&self, caller: &Principal, id: BatchId) -> LedgerResult<()> {
        self.commit("mark_sold", |state, now, events| {
            let LedgerState {
                roles,
                batches,
                history,
            } = state;
            roles.require_role(Role::Retailer, caller)?;
            let batch = batches.get_mut(id)?;
            if !batch.is_owned_by(caller) {
                return Err(LedgerError::NotOwner {
                    id,
                    caller: *caller,
                });
            }
            Operation::MarkSold.check(id, batch.status())?;
            let log = history.get_mut(id)?;

            let next = BatchStatus::Sold;
            batch.set_status(next);
            batch.set_owner(None);
            log.push_status(next, now);

            events.push(LedgerEvent::StatusChanged {
                id,
                new_status: next,
            });
            Ok(())
        })?;
        info!(%id, "Batch sold");
        Ok(())
    }

    fn get_batch(&self, id: BatchId) -> LedgerResult<Batch> {
        self.state.read().batches.get(id).cloned()
    }

    fn get_batch_by_sequence(&self, name: &str, sequence: u64) -> LedgerResult<Batch> {
        self.state.read().batches.lookup(name, sequence).cloned()
    }

    fn status_history(&self, id: BatchId) -> LedgerResult<Vec<StatusChange>> {
        Ok(self.state.read().history.status_history(id)?.to_vec())
    }

    fn certificate_history(&self, id: BatchId) -> LedgerResult<Vec<CertificateRecord>> {
        Ok(self.state.read().history.certificate_history(id)?.to_vec())
    }

    fn transfer_history(&self, id: BatchId) -> LedgerResult<Vec<TransferRecord>> {
        Ok(self.state.read().history.transfer_history(id)?.to_vec())
    }

    fn batch_count(&self) -> u64 {
        self.state.read().batches.count()
    }

    fn name_count(&self, name: &str) -> u64 {
        self.state.read().batches.name_count(name)
    }

    fn batches_owned_by(&self, principal: &Principal) -> Vec<Batch> {
        self.state
            .read()
            .batches
            .owned_by(principal)
            .cloned()
            .collect()
    }

    fn submit(&self, request: AuthenticatedRequest<LedgerCommand>) -> LedgerResult<CommandOutcome> {
        if !request.is_supported_version() {
            let err = LedgerError::UnsupportedVersion {
                received: request.version,
                supported: AuthenticatedRequest::<LedgerCommand>::CURRENT_VERSION,
            };
            self.reject(request.payload.name(), &err);
            return Err(err);
        }
        let op = request.payload.name();
        debug!(
            request_id = %request.request_id,
            caller = %request.caller,
            op,
            "Dispatching command"
        );
        // Role names are parsed before any commit, so count that refusal here.
        dispatch(self, &request.caller, request.payload).inspect_err(|err| {
            if matches!(err, LedgerError::UnknownRole(_)) {
                self.reject(op, err);
            }
        })
    }
}
