//! Criterion benchmarks for tile-graph construction and the consistency check.
//! Focus sizes: n x n triangular lattice patches, n in {4, 8, 12}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p hn-tiling --bench tile_bench

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hn_tiling::api::{check, BaseGraph, Shape, Symmetry, TileGraph};
use nalgebra::Vector3;

/// Triangular lattice patch colored with the 7-coloring `(i + 3j) mod 7`.
fn lattice(n: usize) -> BaseGraph {
    let mut g = BaseGraph::new(Arc::new(Symmetry::trivial()), Shape::Plane);
    let h = 3f64.sqrt() / 2.0;
    for j in 0..n {
        for i in 0..n {
            let p = Vector3::new(i as f64 + 0.5 * j as f64, j as f64 * h, 0.0);
            g.add_vertex(((i + 3 * j) % 7) as i32, p).unwrap();
        }
    }
    let at = |i: usize, j: usize| j * n + i;
    for j in 0..n {
        for i in 0..n {
            if i + 1 < n {
                g.toggle_edge_by_index(at(i, j), at(i + 1, j)).unwrap();
            }
            if j + 1 < n {
                g.toggle_edge_by_index(at(i, j), at(i, j + 1)).unwrap();
                if i > 0 {
                    g.toggle_edge_by_index(at(i, j), at(i - 1, j + 1)).unwrap();
                }
            }
        }
    }
    g
}

fn bench_tiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_graph");
    for &n in &[4usize, 8, 12] {
        let base = lattice(n);
        group.bench_with_input(BenchmarkId::new("build", n), &base, |b, base| {
            b.iter(|| TileGraph::build(base))
        });
        group.bench_with_input(BenchmarkId::new("check", n), &base, |b, base| {
            b.iter(|| check(base))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tiles);
criterion_main!(benches);
