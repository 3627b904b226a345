//! Property-based tests for the transition engine.
//!
//! Random operation sequences, issued by a mix of properly and improperly
//! authorized callers, must never move a batch off the transition graph and
//! must never leave a trace when rejected.

use crate::adapters::{ManualClock, RecordingSink};
use crate::domain::transitions::is_legal_edge;
use crate::domain::Batch;
use crate::ports::inbound::BatchLedgerApi;
use crate::service::{LedgerConfig, TransitionEngine};
use proptest::prelude::*;
use shared_types::{BatchId, Principal, Role};
use std::collections::HashMap;
use std::sync::Arc;

const ADMIN: Principal = Principal::repeat(0xAD);
const NAMES: [&str; 3] = ["Wagyu", "Lamb", "Goat"];

/// Principal `i` holds role `Role::ALL[i]`; index 5 holds nothing.
fn principal(index: usize) -> Principal {
    Principal::repeat(index as u8 + 1)
}

#[derive(Debug, Clone)]
enum Op {
    Create { caller: usize, name: usize },
    Slaughter { caller: usize, id: u64, attested: bool },
    Certify { caller: usize, id: u64, halal: bool, empty_hash: bool },
    Transfer { caller: usize, id: u64, to: usize },
    Sell { caller: usize, id: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let caller = 0usize..6;
    let id = 1u64..8;
    prop_oneof![
        3 => (caller.clone(), 0usize..NAMES.len()).prop_map(|(caller, name)| Op::Create { caller, name }),
        2 => (caller.clone(), id.clone(), any::<bool>())
            .prop_map(|(caller, id, attested)| Op::Slaughter { caller, id, attested }),
        2 => (caller.clone(), id.clone(), any::<bool>(), prop::bool::weighted(0.1))
            .prop_map(|(caller, id, halal, empty_hash)| Op::Certify { caller, id, halal, empty_hash }),
        3 => (caller.clone(), id.clone(), 0usize..6).prop_map(|(caller, id, to)| Op::Transfer { caller, id, to }),
        1 => (caller, id).prop_map(|(caller, id)| Op::Sell { caller, id }),
    ]
}

type Engine = TransitionEngine<ManualClock, RecordingSink>;

fn engine() -> Engine {
    let engine = TransitionEngine::new(
        ADMIN,
        LedgerConfig::default(),
        Arc::new(ManualClock::new(0)),
        Arc::new(RecordingSink::new()),
    );
    for (index, role) in Role::ALL.into_iter().enumerate() {
        engine.grant_role(&ADMIN, role, principal(index)).unwrap();
    }
    engine
}

/// Owners act as themselves half the time so that transfers and sales can
/// actually succeed.
fn resolve_caller(engine: &Engine, op: &Op) -> Principal {
    let (caller, id) = match op {
        Op::Transfer { caller, id, .. } | Op::Sell { caller, id } => (*caller, *id),
        Op::Create { caller, .. } | Op::Slaughter { caller, .. } | Op::Certify { caller, .. } => {
            return principal(*caller)
        }
    };
    match engine.get_batch(BatchId(id)).ok().and_then(|b| b.current_owner()) {
        Some(owner) if caller % 2 == 0 => owner,
        _ => principal(caller),
    }
}

fn apply(engine: &Engine, op: &Op) -> bool {
    let caller = resolve_caller(engine, op);
    match *op {
        Op::Create { name, .. } => engine.create_batch(&caller, NAMES[name]).is_ok(),
        Op::Slaughter { id, attested, .. } => {
            engine.record_slaughter(&caller, BatchId(id), attested).is_ok()
        }
        Op::Certify {
            id,
            halal,
            empty_hash,
            ..
        } => {
            let hash = if empty_hash { "" } else { "QmHash" };
            engine.certify(&caller, BatchId(id), hash, halal).is_ok()
        }
        Op::Transfer { id, to, .. } => engine
            .transfer_ownership(&caller, BatchId(id), principal(to))
            .is_ok(),
        Op::Sell { id, .. } => engine.mark_sold(&caller, BatchId(id)).is_ok(),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    batches: Vec<Batch>,
    history_lengths: Vec<(usize, usize, usize)>,
    events: usize,
}

fn snapshot(engine: &Engine) -> Snapshot {
    let batches = engine.all_batches();
    let history_lengths = batches
        .iter()
        .map(|b| {
            (
                engine.status_history(b.id()).unwrap().len(),
                engine.certificate_history(b.id()).unwrap().len(),
                engine.transfer_history(b.id()).unwrap().len(),
            )
        })
        .collect();
    Snapshot {
        batches,
        history_lengths,
        events: engine.sink().len(),
    }
}

proptest! {
    /// Property: rejected operations change nothing; accepted ones move at
    /// most one batch along exactly one legal edge and add exactly one
    /// status history entry.
    #[test]
    fn prop_operations_follow_the_graph(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let engine = engine();

        for op in &ops {
            let before = snapshot(&engine);
            let applied = apply(&engine, op);
            let after = snapshot(&engine);

            if !applied {
                prop_assert_eq!(&before, &after);
                continue;
            }

            if let Op::Create { .. } = op {
                prop_assert_eq!(after.batches.len(), before.batches.len() + 1);
                prop_assert_eq!(after.history_lengths.last().map(|h| h.0), Some(1));
                continue;
            }

            let mut changed = 0;
            for (i, (old, new)) in before.batches.iter().zip(&after.batches).enumerate() {
                if old.status() != new.status() {
                    changed += 1;
                    prop_assert!(is_legal_edge(old.status(), new.status()));
                    prop_assert_eq!(after.history_lengths[i].0, before.history_lengths[i].0 + 1);
                } else {
                    prop_assert_eq!(old, new);
                    prop_assert_eq!(after.history_lengths[i], before.history_lengths[i]);
                }
            }
            prop_assert_eq!(changed, 1);
        }

        // Status history replays the batch's path through the graph.
        for batch in engine.all_batches() {
            let history = engine.status_history(batch.id()).unwrap();
            prop_assert_eq!(history.last().map(|s| s.status), Some(batch.status()));
            for pair in history.windows(2) {
                prop_assert!(is_legal_edge(pair[0].status, pair[1].status));
            }
        }
    }

    /// Property: per-name sequences are exactly 1..=k and map back to their ids.
    #[test]
    fn prop_name_sequences_are_gap_free(names in prop::collection::vec(0usize..NAMES.len(), 0..40)) {
        let engine = engine();
        let producer = principal(0);
        for name in &names {
            engine.create_batch(&producer, NAMES[*name]).unwrap();
        }

        let mut seen: HashMap<&str, Vec<u64>> = HashMap::new();
        for batch in engine.all_batches() {
            let name = NAMES.iter().copied().find(|n| *n == batch.name()).unwrap();
            seen.entry(name).or_default().push(batch.name_sequence());
            prop_assert_eq!(
                engine.get_batch_by_sequence(batch.name(), batch.name_sequence()).unwrap().id(),
                batch.id()
            );
            prop_assert_eq!(engine.get_batch_by_label(&batch.label()).unwrap().id(), batch.id());
        }
        for (name, sequences) in seen {
            let k = engine.name_count(name);
            prop_assert_eq!(sequences, (1..=k).collect::<Vec<_>>());
        }
        prop_assert_eq!(engine.batch_count(), names.len() as u64);
    }

    /// Property: repeating a failed operation yields the identical error.
    #[test]
    fn prop_failure_is_idempotent(op in op_strategy(), repeats in 1usize..5) {
        let engine = engine();
        engine.create_batch(&principal(0), "Wagyu").unwrap();

        let before = snapshot(&engine);
        let caller = resolve_caller(&engine, &op);
        let attempt = || match &op {
            Op::Create { .. } => engine.create_batch(&caller, "").map(|_| ()),
            Op::Slaughter { id, .. } => engine.certify(&caller, BatchId(*id), "QmHash", true),
            Op::Certify { id, .. } | Op::Transfer { id, .. } | Op::Sell { id, .. } => {
                engine.mark_sold(&caller, BatchId(*id))
            }
        };

        let first = attempt().unwrap_err();
        for _ in 0..repeats {
            prop_assert_eq!(attempt().unwrap_err(), first.clone());
        }
        prop_assert_eq!(snapshot(&engine), before);
    }
}
