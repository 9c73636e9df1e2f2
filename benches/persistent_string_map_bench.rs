//! Benchmark for PersistentStringMap vs standard HashMap.
//!
//! Compares the persistent map against `std::collections::HashMap` (with the
//! default SipHash and with the FNV-1a hasher the map uses internally) for
//! common operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use persistent_string_map::persistent::PersistentStringMap;
use persistent_string_map::persistent::hash::FnvBuildHasher;
use std::collections::HashMap;
use std::hint::black_box;

fn keys(size: usize) -> Vec<String> {
    (0..size).map(|index| format!("key-{index}")).collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = keys(size);

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap", size),
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
            BenchmarkId::new("PersistentStringMap::insert_in_place", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut map = PersistentStringMap::new();
                    for (index, key) in keys.iter().enumerate() {
                        map = map.insert_in_place(black_box(key), black_box(index));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map = HashMap::new();
                for (index, key) in keys.iter().enumerate() {
                    map.insert(black_box(key.as_str()), black_box(index));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1_000, 10_000] {
        let keys = keys(size);
        let persistent_map: PersistentStringMap<usize> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key, index))
            .collect();
        let standard_map: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key.as_str(), index))
            .collect();
        let mut fnv_map = HashMap::with_hasher(FnvBuildHasher);
        fnv_map.extend(standard_map.iter().map(|(key, value)| (*key, *value)));

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in keys {
                        if let Some(&value) = persistent_map.get(black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut sum = 0;
                for key in keys {
                    if let Some(&value) = standard_map.get(black_box(key.as_str())) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("HashMap<FnvBuildHasher>", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in keys {
                        if let Some(&value) = fnv_map.get(black_box(key.as_str())) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [100, 1_000, 10_000] {
        let keys = keys(size);
        let persistent_map: PersistentStringMap<usize> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key, index))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap", size),
            &keys,
            |bencher, keys| {
                bencher.iter(|| {
                    let mut map = persistent_map.clone();
                    for key in keys.iter().step_by(2) {
                        map = map.remove(black_box(key));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("HashMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut map: HashMap<&str, usize> = keys
                    .iter()
                    .enumerate()
                    .map(|(index, key)| (key.as_str(), index))
                    .collect();
                for key in keys.iter().step_by(2) {
                    map.remove(black_box(key.as_str()));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [100, 1_000, 10_000] {
        let keys = keys(size);
        let persistent_map: PersistentStringMap<usize> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key, index))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap::iter", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let sum: usize = persistent_map.values().sum();
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentStringMap::for_each", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut sum = 0;
                    persistent_map.for_each(|_, value| sum += value);
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_iteration
);

criterion_main!(benches);
