//! # Halal-Chain Ledger Benchmarks
//!
//! Hot paths of the batch ledger:
//!
//! | Path | Expected cost |
//! |------|---------------|
//! | `create_batch` | O(1) amortised (Vec push + name index) |
//! | `get_batch_by_label` | O(1) (hash lookup + Vec index) |
//! | Full custody chain | 6 commits |
//! | `submit` | JSON-free dispatch overhead over direct calls |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hc_01_batch_ledger::prelude::*;
use hc_01_batch_ledger::NoOpSink;
use hc_tests::fixtures::{staffed_ledger, CERT_HASH};
use std::sync::Arc;

fn bench_create_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("hc-01-create-batch");

    for names in [1usize, 100, 10_000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("distinct_names", names), &names, |b, &names| {
            let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
            let mut i = 0usize;
            b.iter(|| {
                let name = format!("Batch{}", i % names);
                i += 1;
                black_box(ledger.create_batch(&actors.producer, &name).is_ok())
            })
        });
    }

    group.finish();
}

fn bench_label_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hc-01-label-lookup");

    for populated in [100u64, 10_000] {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        for _ in 0..populated {
            let _ = ledger.create_batch(&actors.producer, "Wagyu");
        }
        let label = format!("Wagyu_{}", populated / 2);

        group.bench_with_input(BenchmarkId::new("by_label", populated), &label, |b, label| {
            b.iter(|| black_box(ledger.get_batch_by_label(label).is_ok()))
        });
    }

    group.finish();
}

fn bench_custody_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("hc-01-custody-chain");
    let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));

    group.bench_function("create_to_sold", |b| {
        b.iter(|| {
            let id = actors.certified_batch(&ledger, "Wagyu");
            actors.sell(&ledger, id);
            black_box(id)
        })
    });

    group.bench_function("submit_create", |b| {
        b.iter(|| {
            let request = AuthenticatedRequest::new(
                actors.producer,
                LedgerCommand::CreateBatch {
                    name: "Wagyu".into(),
                },
            );
            black_box(ledger.submit(request).is_ok())
        })
    });

    group.bench_function("rejected_certify", |b| {
        b.iter(|| black_box(ledger.certify(&actors.outsider, BatchId(1), CERT_HASH, true).is_err()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_create_batch,
    bench_label_lookup,
    bench_custody_chain
);
criterion_main!(benches);
