//! # Batch Ledger
//!
//! The table of batch records. Owns creation and field storage; performs no
//! authorization and no transition checks.
//!
//! Records live in a `Vec` indexed by `id - 1`, which makes ids contiguous
//! from 1 with no gaps and no reuse.

use crate::domain::entities::Batch;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::name_index::NameIndex;
use shared_types::{BatchId, Principal, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct BatchLedger {
    batches: Vec<Batch>,
    names: NameIndex,
}

impl BatchLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new batch in `Created` status, owned by `producer`.
    ///
    /// The caller is responsible for checking that `producer` holds the
    /// Producer role.
    ///
    /// # Errors
    ///
    /// `EmptyName` if `name` is empty.
    pub fn create(
        &mut self,
        name: &str,
        producer: Principal,
        created_at: Timestamp,
    ) -> LedgerResult<BatchId> {
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let id = BatchId(self.batches.len() as u64 + 1);
        let sequence = self.names.reserve_sequence(name, id);
        self.batches
            .push(Batch::new(id, name.to_owned(), sequence, producer, created_at));
        Ok(id)
    }

    /// # Errors
    ///
    /// `BatchNotFound` if no batch carries `id`.
    pub fn get(&self, id: BatchId) -> LedgerResult<&Batch> {
        Self::slot(id)
            .and_then(|index| self.batches.get(index))
            .ok_or(LedgerError::BatchNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: BatchId) -> LedgerResult<&mut Batch> {
        Self::slot(id)
            .and_then(|index| self.batches.get_mut(index))
            .ok_or(LedgerError::BatchNotFound(id))
    }

    /// Resolves `(name, sequence)` through the name index.
    ///
    /// # Errors
    ///
    /// `SequenceNotFound` if that pair was never assigned.
    pub fn lookup(&self, name: &str, sequence: u64) -> LedgerResult<&Batch> {
        let id = self
            .names
            .lookup(name, sequence)
            .ok_or_else(|| LedgerError::SequenceNotFound {
                name: name.to_owned(),
                sequence,
            })?;
        self.get(id)
    }

    /// Number of batches ever created; also the highest id.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.batches.len() as u64
    }

    #[must_use]
    pub fn name_count(&self, name: &str) -> u64 {
        self.names.count(name)
    }

    /// All batches in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter()
    }

    /// Batches currently in `principal`'s custody, in id order.
    pub fn owned_by<'a>(&'a self, principal: &'a Principal) -> impl Iterator<Item = &'a Batch> {
        self.batches.iter().filter(move |b| b.is_owned_by(principal))
    }

    fn slot(id: BatchId) -> Option<usize> {
        usize::try_from(id.get().checked_sub(1)?).ok()
    }
}
