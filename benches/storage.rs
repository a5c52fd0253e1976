//! Ledger benchmark: dedup hits and durable appends.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use traffic_sentinel::action::SimulatedBlock;
use traffic_sentinel::scoring::Verdict;
use traffic_sentinel::storage::BlockLedger;

fn bench_already_blocked(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blocked_ips.log");
    let mut ledger = BlockLedger::open(&path, Box::new(SimulatedBlock)).unwrap();
    let verdicts: Vec<Verdict> = (0..100)
        .map(|i| Verdict {
            address: format!("10.0.0.{}", i),
            is_anomalous: true,
        })
        .collect();
    ledger.apply(&verdicts).unwrap();

    c.bench_function("ledger_skip_100_known", |b| {
        b.iter(|| black_box(ledger.apply(&verdicts)).unwrap())
    });
}

fn bench_append(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blocked_ips.log");
    let mut ledger = BlockLedger::open(&path, Box::new(SimulatedBlock)).unwrap();
    let mut n: u64 = 0;

    c.bench_function("ledger_append_new", |b| {
        b.iter(|| {
            n += 1;
            let v = Verdict {
                address: format!("addr-{}", n),
                is_anomalous: true,
            };
            black_box(ledger.apply(std::slice::from_ref(&v))).unwrap()
        })
    });
}

criterion_group!(benches, bench_already_blocked, bench_append);
criterion_main!(benches);
