use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ledger_hashtable::{HashedHome, ProbeTable};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

const M: usize = 1 << 16;

fn filled(load: f64, seed: u64) -> (ProbeTable<u64, HashedHome>, Vec<u64>) {
    let mut t = ProbeTable::new(M, HashedHome::new()).unwrap();
    let keys: Vec<u64> = lcg(seed).take((M as f64 * load) as usize).collect();
    for &k in &keys {
        t.insert(k).unwrap();
    }
    (t, keys)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("probe_table_insert_to_90pct", |b| {
        let keys: Vec<u64> = lcg(1).take(M * 9 / 10).collect();
        b.iter_batched(
            || ProbeTable::<u64, _>::new(M, HashedHome::new()).unwrap(),
            |mut t| {
                for &k in &keys {
                    black_box(t.insert(k).unwrap());
                }
                t
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_find_hit(c: &mut Criterion) {
    c.bench_function("probe_table_find_hit_at_90pct", |b| {
        let (t, keys) = filled(0.9, 7);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.find(k));
        })
    });
}

fn bench_find_miss(c: &mut Criterion) {
    c.bench_function("probe_table_find_miss_at_90pct", |b| {
        let (t, _) = filled(0.9, 11);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| black_box(t.find(&miss.next().unwrap())))
    });
}

// Steady state: remove the oldest key and insert a new one.
fn bench_churn(c: &mut Criterion) {
    c.bench_function("probe_table_churn_at_90pct", |b| {
        let (mut t, keys) = filled(0.9, 13);
        let mut live: std::collections::VecDeque<u64> = keys.into();
        let mut fresh = lcg(0x5eed);
        b.iter(|| {
            let old = live.pop_front().unwrap();
            black_box(t.remove(&old).unwrap());
            let k = fresh.next().unwrap();
            black_box(t.insert(k).unwrap());
            live.push_back(k);
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_find_hit, bench_find_miss, bench_churn
}
criterion_main!(benches);
