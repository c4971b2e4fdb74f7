use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use graphcol::collections::{HashValue, ListValue, TreeValue};
use graphcol::graph::{KeyedGraph, SequentialGraph, TreeGraph};

/// Benchmark append throughput on a sequential chain
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_append");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut seq = SequentialGraph::new();
                for i in 0..size {
                    seq.append(i as i64).unwrap();
                }
                criterion::black_box(seq.len());
            });
        });
    }
    group.finish();
}

/// Benchmark the rebuild cost of inserting at the front
fn bench_prepend_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_prepend");

    for size in [10, 100, 1000].iter() {
        let seq = SequentialGraph::from_values(0..*size).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut copy = seq.clone();
                copy.prepend(-1).unwrap();
                criterion::black_box(copy.len());
            });
        });
    }
    group.finish();
}

/// Benchmark keyed assignment, including replacement of existing keys
fn bench_keyed_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_set");

    for size in [100, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut map = KeyedGraph::new();
                for i in 0..size {
                    map.set(format!("key{}", i % (size / 2)), i as i64).unwrap();
                }
                criterion::black_box(map.len());
            });
        });
    }
    group.finish();
}

/// Benchmark BST insertion with a scrambled key order
fn bench_tree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_insert");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut tree = TreeGraph::new();
                for i in 0..size {
                    tree.insert((i * 7919 % size) as i64).unwrap();
                }
                criterion::black_box(tree.height());
            });
        });
    }
    group.finish();
}

/// Benchmark path and component queries on a long chain
fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    let seq = SequentialGraph::from_values(0..1000).unwrap();
    let first = seq.order()[0];
    let last = seq.order()[999];

    group.bench_function("shortest_path_1000", |b| {
        b.iter(|| {
            criterion::black_box(seq.graph().shortest_path(first, last));
        });
    });

    group.bench_function("components_1000", |b| {
        b.iter(|| {
            criterion::black_box(seq.graph().connected_components().len());
        });
    });

    group.finish();
}

/// Benchmark wrapper overhead: checks plus display
fn bench_wrappers(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrappers");

    group.bench_function("list_append_1000", |b| {
        b.iter(|| {
            let mut list = ListValue::new();
            for i in 0..1000 {
                list.append(i).unwrap();
            }
            criterion::black_box(list.to_display_string());
        });
    });

    group.bench_function("hash_to_plain_1000", |b| {
        let hash = HashValue::from_pairs((0..1000).map(|i| (format!("k{}", i), i))).unwrap();
        b.iter(|| {
            criterion::black_box(hash.to_plain());
        });
    });

    group.finish();
}

/// Benchmark wrapper construction across sizes; time per element should
/// stay flat as the size grows
fn bench_wrapper_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrapper_build");

    for size in [1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("list", size), size, |b, &size| {
            b.iter(|| criterion::black_box(ListValue::from_values(0..size).unwrap().len()));
        });
        group.bench_with_input(BenchmarkId::new("hash", size), size, |b, &size| {
            b.iter(|| {
                let hash = HashValue::from_pairs((0..size).map(|i| (format!("k{}", i), i))).unwrap();
                criterion::black_box(hash.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("tree", size), size, |b, &size| {
            b.iter(|| {
                let tree = TreeValue::from_values((0..size).map(|i| (i * 7919 % size) as i64)).unwrap();
                criterion::black_box(tree.size())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_prepend_rebuild,
    bench_keyed_set,
    bench_tree_insert,
    bench_traversal,
    bench_wrappers,
    bench_wrapper_build,
);
criterion_main!(benches);
