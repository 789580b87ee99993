//! Store throughput benchmarks

use avldb::{IndexedStore, Record, StoreConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const N: i64 = 10_000;

fn scrambled(n: i64) -> Vec<i64> {
    // Multiplicative permutation of 0..n (7919 is prime and coprime to n)
    (0..n).map(|i| (i * 7919) % n).collect()
}

fn filled_store() -> IndexedStore {
    let config = StoreConfig::default().with_verify_invariants(false);
    let mut store = IndexedStore::with_config(config).expect("valid config");
    store.extend(scrambled(N).into_iter().map(|v| Record::new(format!("k{v}"), v)));
    store
}

fn benchmark_store(c: &mut Criterion) {
    c.bench_function("insert_10k_scrambled", |b| {
        b.iter_batched(
            || scrambled(N),
            |values| {
                let config = StoreConfig::default().with_verify_invariants(false);
                let mut store = IndexedStore::with_config(config).expect("valid config");
                for v in values {
                    store.insert(Record::new("k", v));
                }
                black_box(store.len())
            },
            BatchSize::LargeInput,
        );
    });

    let mut store = filled_store();
    c.bench_function("search_hit", |b| {
        b.iter(|| black_box(store.search_comparisons(black_box("k4242"), black_box(4242))));
    });

    let store = filled_store();
    c.bench_function("range_100", |b| {
        b.iter(|| black_box(store.range_query(black_box(5000), black_box(5099)).len()));
    });

    c.bench_function("delete_reinsert", |b| {
        b.iter_batched(
            filled_store,
            |mut store| {
                store.delete("k5000", 5000);
                store.insert(Record::new("k5000", 5000));
                black_box(store.len())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, benchmark_store);
criterion_main!(benches);
