//! # History Logs
//!
//! Three append-only logs per batch: status changes, certificates, transfers.
//! Nothing here edits or removes an entry.

use crate::domain::entities::{CertificateRecord, StatusChange, TransferRecord};
use crate::domain::errors::{LedgerError, LedgerResult};
use shared_types::{BatchId, BatchStatus, Principal, Timestamp};
use std::collections::HashMap;

/// The logs of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchHistory {
    status: Vec<StatusChange>,
    certificates: Vec<CertificateRecord>,
    transfers: Vec<TransferRecord>,
}

impl BatchHistory {
    #[must_use]
    pub fn status(&self) -> &[StatusChange] {
        &self.status
    }

    #[must_use]
    pub fn certificates(&self) -> &[CertificateRecord] {
        &self.certificates
    }

    #[must_use]
    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    pub(crate) fn push_status(&mut self, status: BatchStatus, at: Timestamp) {
        self.status.push(StatusChange {
            status,
            changed_at: at,
        });
    }

    pub(crate) fn push_certificate(&mut self, hash: String, is_halal: bool, at: Timestamp) {
        self.certificates.push(CertificateRecord {
            certificate_hash: hash,
            is_halal,
            certified_at: at,
        });
    }

    pub(crate) fn push_transfer(&mut self, from: Principal, to: Principal, at: Timestamp) {
        self.transfers.push(TransferRecord {
            from,
            to,
            transferred_at: at,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryLogs {
    logs: HashMap<BatchId, BatchHistory>,
}

impl HistoryLogs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens empty logs for a freshly created batch.
    pub(crate) fn open(&mut self, id: BatchId) -> &mut BatchHistory {
        self.logs.entry(id).or_default()
    }

    /// # Errors
    ///
    /// `BatchNotFound` if no logs were opened for `id`.
    pub fn get(&self, id: BatchId) -> LedgerResult<&BatchHistory> {
        self.logs.get(&id).ok_or(LedgerError::BatchNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: BatchId) -> LedgerResult<&mut BatchHistory> {
        self.logs.get_mut(&id).ok_or(LedgerError::BatchNotFound(id))
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn append_status(
        &mut self,
        id: BatchId,
        status: BatchStatus,
        at: Timestamp,
    ) -> LedgerResult<()> {
        self.get_mut(id)?.push_status(status, at);
        Ok(())
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn append_certificate(
        &mut self,
        id: BatchId,
        hash: String,
        is_halal: bool,
        at: Timestamp,
    ) -> LedgerResult<()> {
        self.get_mut(id)?.push_certificate(hash, is_halal, at);
        Ok(())
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn append_transfer(
        &mut self,
        id: BatchId,
        from: Principal,
        to: Principal,
        at: Timestamp,
    ) -> LedgerResult<()> {
        self.get_mut(id)?.push_transfer(from, to, at);
        Ok(())
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn status_history(&self, id: BatchId) -> LedgerResult<&[StatusChange]> {
        Ok(self.get(id)?.status())
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn certificate_history(&self, id: BatchId) -> LedgerResult<&[CertificateRecord]> {
        Ok(self.get(id)?.certificates())
    }

    /// # Errors
    ///
    /// `BatchNotFound` if `id` is unknown.
    pub fn transfer_history(&self, id: BatchId) -> LedgerResult<&[TransferRecord]> {
        Ok(self.get(id)?.transfers())
    }
}
