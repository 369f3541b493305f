use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use lattice_core::prelude::*;

// ── Basis ───────────────────────────────────────────────────────────────────

fn bench_basis_chunks(c: &mut Criterion) {
    let bilinear = BilinearNoise::new(0);
    let bicubic = BicubicNoise::new(0);

    let mut group = c.benchmark_group("basis_chunk_2d");
    for side in [64usize, 256] {
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::new("bilinear", side), &side, |b, &n| {
            b.iter(|| bilinear.get_chunk_uniform(black_box([0.5, 0.5]), [n, n], 0.05));
        });
        group.bench_with_input(BenchmarkId::new("bicubic", side), &side, |b, &n| {
            b.iter(|| bicubic.get_chunk_uniform(black_box([0.5, 0.5]), [n, n], 0.05));
        });
    }
    group.finish();
}

fn bench_tricubic_chunk(c: &mut Criterion) {
    let tricubic = TricubicNoise::new(0);
    let mut group = c.benchmark_group("basis_chunk_3d");
    group.throughput(Throughput::Elements(32 * 32 * 32));
    group.bench_function("tricubic_32", |b| {
        b.iter(|| tricubic.get_chunk_uniform(black_box([0.0; 3]), [32, 32, 32], 0.1));
    });
    group.finish();
}

// ── Trees ───────────────────────────────────────────────────────────────────

fn bench_sandbox_tree(c: &mut Criterion) {
    let tree = BicubicNoise::new(3424)
        .scale_uniform(50.0)
        .shift([-128.0, -128.0])
        .normalize()
        .sigmoid(4.0, 4.0)
        .expect("non-zero power")
        .kernel_filter(gaussian5());

    c.bench_function("sandbox_tree_256", |b| {
        b.iter(|| tree.get_chunk_unit(black_box([0.0, 0.0]), [256, 256]));
    });
}

fn bench_fbm(c: &mut Criterion) {
    let tree = fbm(6, 2.0, 0.5, |i| BicubicNoise::new(i as i32)).expect("valid octaves");
    c.bench_function("fbm6_128", |b| {
        b.iter(|| tree.get_chunk_uniform(black_box([0.0, 0.0]), [128, 128], 0.02));
    });
}

criterion_group!(benches, bench_basis_chunks, bench_tricubic_chunk, bench_sandbox_tree, bench_fbm);
criterion_main!(benches);
