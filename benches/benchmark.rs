use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use chemgraph::{
    flexibility::flexibility,
    isomorphism::match_pattern,
    molecule::{Atom, Bond, MolGraph, CARBON},
    paths::count_simple_paths,
    shape::{shape_indices, KierOptions},
};

/// Linear alkane skeleton with `n` carbons.
fn alkane(n: usize) -> MolGraph {
    MolGraph::from_parts(
        (0..n).map(|i| (i, Atom::new(CARBON))),
        (1..n).map(|i| (i - 1, i, Bond::new(1.0))),
    )
    .expect("alkane skeleton is well formed")
}

/// Saturated skeleton of `rings` linearly fused six-membered rings.
fn fused_rings(rings: usize) -> MolGraph {
    // Two rows of 2 * rings + 1 carbons joined by rungs at even positions.
    let width = 2 * rings + 1;
    let mut bonds = Vec::new();
    for row in 0..2 {
        for i in 1..width {
            bonds.push((row * width + i - 1, row * width + i));
        }
    }
    for i in (0..width).step_by(2) {
        bonds.push((i, width + i));
    }
    MolGraph::from_parts(
        (0..2 * width).map(|i| (i, Atom::new(CARBON))),
        bonds.into_iter().map(|(u, v)| (u, v, Bond::new(1.0))),
    )
    .expect("fused ring skeleton is well formed")
}

pub fn descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptors");

    let molecules = [
        ("alkane_20", alkane(20)),
        ("alkane_80", alkane(80)),
        ("rings_3", fused_rings(3)),
        ("rings_8", fused_rings(8)),
    ];

    for (name, mol) in &molecules {
        group.bench_with_input(BenchmarkId::new("paths_3", name), mol, |b, mol| {
            b.iter(|| count_simple_paths(mol, 3));
        });
        group.bench_with_input(BenchmarkId::new("shape", name), mol, |b, mol| {
            b.iter(|| shape_indices(mol, KierOptions::default()));
        });
        group.bench_with_input(BenchmarkId::new("flexibility", name), mol, |b, mol| {
            b.iter(|| flexibility(mol));
        });
    }

    group.finish();
}

pub fn matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    let pattern = fused_rings(1);

    for rings in [2, 4, 6] {
        let target = fused_rings(rings);
        group.bench_with_input(BenchmarkId::new("six_ring", rings), &target, |b, t| {
            b.iter(|| match_pattern(t, &pattern));
        });
    }

    group.finish();
}

criterion_group! {
    name = benchmark;
    config = Criterion::default().sample_size(20);
    targets = descriptors, matching
}
criterion_main!(benchmark);
