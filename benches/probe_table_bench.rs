use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_table::{Hashed, ProbeTable, TableConfig};
use std::time::Duration;

type HashedTable = ProbeTable<String, String, Hashed>;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("user{:016x}", n)
}

fn hashed(capacity: usize) -> HashedTable {
    ProbeTable::with_hasher(TableConfig::new(capacity, 0.7), Hashed::default()).unwrap()
}

fn filled(seed: u64, n: usize) -> (HashedTable, Vec<String>) {
    let mut t = hashed(11);
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for k in &keys {
        t.insert(k.clone(), k.clone());
    }
    (t, keys)
}

fn bench_insert_fresh_10k(c: &mut Criterion) {
    c.bench_function("probe::insert_fresh_10k", |b| {
        b.iter_batched(
            || hashed(11),
            |mut t| {
                for x in lcg(1).take(10_000) {
                    black_box(t.insert(key(x), String::from("pw")));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });

    // Every insert into one length-hashed cluster walks the whole cluster.
    c.bench_function("probe::insert_key_length_cluster_1k", |b| {
        b.iter_batched(
            || ProbeTable::<String, String>::new(11, 0.7).unwrap(),
            |mut t| {
                for x in lcg(2).take(1_000) {
                    black_box(t.insert(key(x), String::from("pw")));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_login_hit_and_miss(c: &mut Criterion) {
    let (t, keys) = filled(7, 10_000);
    c.bench_function("probe::login_hit_10k", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(t.login(k.as_str(), k.as_str()));
            }
        })
    });

    let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
    c.bench_function("probe::login_miss_10k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(t.login(k.as_str(), "pw"));
            }
        })
    });
}

fn bench_delete_reinsert_churn(c: &mut Criterion) {
    c.bench_function("probe::delete_reinsert_churn_5k", |b| {
        b.iter_batched(
            || filled(11, 10_000),
            |(mut t, keys)| {
                for k in keys.iter().step_by(2) {
                    black_box(t.delete(k.as_str()));
                }
                for k in keys.iter().step_by(2) {
                    black_box(t.insert(k.clone(), String::from("pw2")));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fresh_10k, bench_login_hit_and_miss, bench_delete_reinsert_churn
}
criterion_main!(benches);
