//! Benchmarks for the generational arena backing division trees.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_core::alloc::{Arena, IndexSlot};

#[derive(Clone, Default)]
struct NodeData {
    children: Vec<IndexSlot>,
    weight: f64,
    area: (i32, i32, i32, i32),
}

fn bench_arena_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_insert");

    for size in [10, 100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut arena = Arena::new();
                for _ in 0..size {
                    arena.insert(black_box(NodeData::default()));
                }
                arena
            });
        });
    }

    group.finish();
}

fn bench_arena_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_rebuild");

    for size in [100, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut arena = Arena::new();
                    let slots: Vec<IndexSlot> =
                        (0..size).map(|_| arena.insert(NodeData::default())).collect();
                    (arena, slots)
                },
                |(mut arena, slots)| {
                    for slot in slots {
                        arena.remove(black_box(slot));
                    }
                    for _ in 0..size {
                        arena.insert(NodeData::default());
                    }
                    black_box(arena)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_arena_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_access");

    for size in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(size as u64));

        let mut arena = Arena::new();
        let slots: Vec<IndexSlot> = (0..size)
            .map(|i| {
                arena.insert(NodeData {
                    weight: i as f64,
                    ..NodeData::default()
                })
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for &slot in &slots {
                    if let Some(node) = arena.get(black_box(slot)) {
                        sum += node.weight + node.area.2 as f64 + node.children.len() as f64;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_arena_insert, bench_arena_rebuild, bench_arena_access);
criterion_main!(benches);
