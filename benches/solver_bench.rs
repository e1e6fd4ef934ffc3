//! Benchmarks for bnb-color
//!
//! Run with: cargo bench

use bnb_color::config::SolverConfig;
use bnb_color::graph::Graph;
use bnb_color::heuristics::{DSatur, GreedyClique, QuotientGraph, Strategies};
use bnb_color::search::{BoundOracle, Brancher, ConstraintSet, Partition};
use bnb_color::solver::Coordinator;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;

/// Deterministic pseudo-random graph
fn random_graph(n: usize, density_percent: u64, seed: u64) -> Graph {
    let mut state = seed;
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if (state >> 33) % 100 < density_percent {
                edges.push((u, v));
            }
        }
    }
    Graph::from_edges(n, &edges)
}

fn benchmark_heuristics(c: &mut Criterion) {
    let graph = random_graph(120, 30, 7);
    let partition = Partition::new(graph.len());
    let constraints = ConstraintSet::new();
    let view = QuotientGraph::build(&graph, &partition, &constraints);

    c.bench_function("dsatur_120", |b| {
        b.iter(|| black_box(DSatur::color_classes(&view)))
    });

    let clique = GreedyClique::default();
    c.bench_function("greedy_clique_120", |b| {
        b.iter(|| black_box(clique.clique_classes(&view)))
    });

    c.bench_function("quotient_build_120", |b| {
        b.iter(|| black_box(QuotientGraph::build(&graph, &partition, &constraints)))
    });
}

fn benchmark_branch(c: &mut Criterion) {
    let graph = Arc::new(random_graph(60, 40, 11));
    let brancher = Brancher::new(BoundOracle::new(graph, Strategies::default()));
    let (root, _) = brancher.oracle().root();

    c.bench_function("branch_root_60", |b| {
        b.iter(|| black_box(brancher.branch(&root)))
    });
}

fn benchmark_solve(c: &mut Criterion) {
    let graph = Arc::new(random_graph(24, 50, 3));
    let coordinator = Coordinator::new(SolverConfig {
        workers: 2,
        batch_size: 5,
        time_limit: Duration::from_secs(30),
        poll_interval: Duration::from_millis(10),
    });

    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    group.bench_function("random_24", |b| {
        b.iter(|| black_box(coordinator.solve(Arc::clone(&graph))))
    });
    group.finish();
}

criterion_group!(benches, benchmark_heuristics, benchmark_branch, benchmark_solve);
criterion_main!(benches);
