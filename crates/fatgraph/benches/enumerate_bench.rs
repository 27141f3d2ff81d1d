//! Criterion benches for enumeration and complex assembly.
//!
//! - valence enumeration: one-vertex roses and the (0,5) trivalent profile,
//!   with and without vertex interning.
//! - M_{g,n} enumeration: all contraction levels.
//! - complex assembly: numbering, orientation and boundary matrices.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fatgraph::enumerate::{enumerate_by_valence, enumerate_moduli_space, EnumCfg};
use fatgraph::homology::{FatgraphComplex, HomologyCfg};

fn bench_valence(c: &mut Criterion) {
    let mut group = c.benchmark_group("valence");
    for (name, intern) in [("interned", true), ("plain", false)] {
        let cfg = EnumCfg {
            intern_vertices: intern,
            ..EnumCfg::default()
        };
        group.bench_function(BenchmarkId::new("rose6", name), |b| {
            b.iter(|| enumerate_by_valence(&[6], &cfg).unwrap().len())
        });
        group.bench_function(BenchmarkId::new("3-3-3-3", name), |b| {
            b.iter(|| enumerate_by_valence(&[3, 3, 3, 3], &cfg).unwrap().len())
        });
    }
    group.finish();
}

fn bench_moduli(c: &mut Criterion) {
    let mut group = c.benchmark_group("moduli");
    group.sample_size(10);
    let cfg = EnumCfg::default();
    for (g, n) in [(0, 4), (1, 2), (2, 1)] {
        group.bench_function(BenchmarkId::new("enumerate", format!("M{g},{n}")), |b| {
            b.iter(|| enumerate_moduli_space(g, n, &cfg).unwrap().len())
        });
    }
    group.finish();
}

fn bench_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("complex");
    group.sample_size(10);
    let cfg = HomologyCfg::default();
    for (g, n) in [(0, 4), (1, 2)] {
        group.bench_function(BenchmarkId::new("build", format!("M{g},{n}")), |b| {
            b.iter(|| FatgraphComplex::build(g, n, &cfg).unwrap().top_edges())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_valence, bench_moduli, bench_complex);
criterion_main!(benches);
