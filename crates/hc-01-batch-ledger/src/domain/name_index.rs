//! # Name Index
//!
//! Maps a batch name to its per-name sequence counter, and `(name, sequence)`
//! to a global id.
//!
//! The ids for one name are stored in creation order, so the counter is the
//! length of that list and sequence `k` lives at index `k - 1`. Sequences are
//! therefore gap-free and each `(name, sequence)` slot is written once.

use shared_types::BatchId;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<BatchId>>,
}

impl NameIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as the next batch named `name` and returns its sequence.
    ///
    /// Only the batch ledger calls this, during creation. Never fails.
    pub(crate) fn reserve_sequence(&mut self, name: &str, id: BatchId) -> u64 {
        let ids = self.by_name.entry(name.to_owned()).or_default();
        ids.push(id);
        ids.len() as u64
    }

    /// The id created as the `sequence`-th batch named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str, sequence: u64) -> Option<BatchId> {
        let index = usize::try_from(sequence.checked_sub(1)?).ok()?;
        self.by_name.get(name)?.get(index).copied()
    }

    /// How many batches have been created with `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> u64 {
        self.by_name.get(name).map_or(0, |ids| ids.len() as u64)
    }
}
