//! Blackboard microbenchmarks using Criterion.
//!
//! These benchmarks measure individual operations in isolation:
//! - Write (insert, overwrite, with and without callbacks)
//! - Read (hit, miss)
//! - Cross-type wipes as the number of registered types grows

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use blackboard::Blackboard;
use blackboard_bench::values::{Health, Position, Status, key, populate_types};

// =============================================================================
// Write Benchmarks
// =============================================================================

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let keys: Vec<String> = (0..count).map(key).collect();

        group.bench_with_input(BenchmarkId::new("insert", count), &keys, |b, keys| {
            b.iter(|| {
                let board = Blackboard::new();
                for k in keys {
                    board.write(k.as_str(), Position::default());
                }
                black_box(board);
            });
        });

        group.bench_with_input(BenchmarkId::new("overwrite", count), &keys, |b, keys| {
            let board = Blackboard::new();
            for k in keys {
                board.write(k.as_str(), Position::default());
            }
            b.iter(|| {
                for k in keys {
                    board.write(k.as_str(), black_box(Position { x: 1.0, y: 2.0, z: 3.0 }));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("overwrite_observed", count), &keys, |b, keys| {
            let board = Blackboard::new();
            for k in keys {
                board.write(k.as_str(), Position::default());
                board.subscribe_pair::<Position>(k.as_str(), |k, p| {
                    black_box((k, p));
                });
            }
            b.iter(|| {
                for k in keys {
                    board.write(k.as_str(), black_box(Position { x: 1.0, y: 2.0, z: 3.0 }));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("overwrite_silent", count), &keys, |b, keys| {
            let board = Blackboard::new();
            for k in keys {
                board.write(k.as_str(), Position::default());
                board.subscribe_pair::<Position>(k.as_str(), |k, p| {
                    black_box((k, p));
                });
            }
            b.iter(|| {
                for k in keys {
                    board.write_with(k.as_str(), black_box(Position::default()), false);
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Read Benchmarks
// =============================================================================

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let keys: Vec<String> = (0..count).map(key).collect();
        let board = Blackboard::new();
        for k in &keys {
            board.write(k.as_str(), Status(format!("status of {k}")));
        }

        group.bench_with_input(BenchmarkId::new("hit_clone", count), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(board.read::<Status>(k).ok());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("hit_borrow", count), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(board.read_with(k, |s: &Status| s.0.len()).ok());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("miss", count), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(board.read::<Health>(k).err());
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Wipe Benchmarks
// =============================================================================

fn bench_wipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("wipe");

    for types in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("key_across_types", types), &types, |b, &n| {
            let board = Blackboard::new();
            b.iter(|| {
                populate_types(&board, "k", n);
                board.wipe_key("k");
            });
        });

        group.bench_with_input(BenchmarkId::new("board", types), &types, |b, &n| {
            let board = Blackboard::new();
            b.iter(|| {
                for i in 0..64 {
                    populate_types(&board, &key(i), n);
                }
                board.wipe_board(false);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_wipe);
criterion_main!(benches);
