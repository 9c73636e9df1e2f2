//! Benchmark for TransientStringMap vs repeated persistent updates.
//!
//! Measures the gain from in-place batch construction over path copying.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use persistent_string_map::persistent::{PersistentStringMap, TransientStringMap};
use std::hint::black_box;

fn keys(size: usize) -> Vec<String> {
    (0..size).map(|index| format!("key-{index}")).collect()
}

// =============================================================================
// Batch insert Benchmark
// =============================================================================

fn benchmark_batch_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("batch_insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = keys(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap::insert", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut map = PersistentStringMap::new();
                    for (index, key) in keys.iter().enumerate() {
                        map = map.insert(black_box(key), black_box(index));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("TransientStringMap::insert", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut transient = TransientStringMap::new();
                    for (index, key) in keys.iter().enumerate() {
                        transient.insert(black_box(key), black_box(index));
                    }
                    black_box(transient.persistent())
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Batch update of a shared map Benchmark
// =============================================================================

fn benchmark_batch_update_shared(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("batch_update_shared");

    for size in [1_000, 10_000] {
        let keys = keys(size);
        let base: PersistentStringMap<usize> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key, index))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap::insert", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut map = base.clone();
                    for key in keys.iter().step_by(10) {
                        map = map.insert(black_box(key), 0);
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("TransientStringMap::insert", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut transient = base.clone().transient();
                    for key in keys.iter().step_by(10) {
                        transient.insert(black_box(key), 0);
                    }
                    black_box(transient.persistent())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_batch_insert, benchmark_batch_update_shared);

criterion_main!(benches);
