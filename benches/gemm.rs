//! Square GEMM benchmark comparison
//!
//! Compares the row-parallel naive kernel, the cache-blocked kernel and the
//! ndarray reference across matrix sizes, one group per size.
//!
//! # Usage:
//! ```bash
//! # Run all kernels at every size
//! cargo bench --bench gemm
//!
//! # Run one size group
//! cargo bench --bench gemm -- gemm_512
//!
//! # Pin the worker count
//! RAYON_NUM_THREADS=8 cargo bench --bench gemm
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use std::hint::black_box;

use tilegemm::verify::{DenseOracle, NdarrayOracle};
use tilegemm::{flops, gemm_blocked, gemm_naive};

/// Row-major `n x n` matrix with entries in `[-1, 1)`.
fn create_matrix(n: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..n * n).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn bench_gemm_by_size(c: &mut Criterion) {
    let sizes = [128, 256, 384, 512, 1000];

    for n in sizes {
        let mut group = c.benchmark_group(format!("gemm_{n}"));
        group.sample_size(20);
        group.throughput(Throughput::Elements(flops(n) as u64));

        let mut rng = StdRng::seed_from_u64(42);
        let a = create_matrix(n, &mut rng);
        let b = create_matrix(n, &mut rng);
        let mut out = vec![0.0; n * n];

        group.bench_with_input(BenchmarkId::new("baseline", n), &n, |bench, &n| {
            bench.iter(|| {
                gemm_naive(black_box(n), black_box(&a), black_box(&b), black_box(&mut out));
                black_box(&out);
            });
        });

        group.bench_with_input(BenchmarkId::new("blocked", n), &n, |bench, &n| {
            bench.iter(|| {
                gemm_blocked(black_box(n), black_box(&a), black_box(&b), black_box(&mut out));
                black_box(&out);
            });
        });

        group.bench_with_input(BenchmarkId::new("ndarray", n), &n, |bench, &n| {
            bench.iter(|| {
                NdarrayOracle
                    .multiply(black_box(n), black_box(&a), black_box(&b), black_box(&mut out))
                    .unwrap();
                black_box(&out);
            });
        });

        group.finish();
    }
}

criterion_group!(benches, bench_gemm_by_size);
criterion_main!(benches);
