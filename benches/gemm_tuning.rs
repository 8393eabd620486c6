//! Block size tuning for the cache-blocked kernel
//!
//! Sweeps row/column tile sizes at a fixed reduction depth, then reduction
//! depths at the default tile, for one matrix size per group.
//!
//! # Usage:
//! ```bash
//! cargo bench --bench gemm_tuning
//!
//! # Only the tile sweep at n=1024
//! cargo bench --bench gemm_tuning -- "tiles_1024"
//!
//! # HTML report
//! cargo bench --bench gemm_tuning && open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::hint::black_box;

use tilegemm::{gemm_blocked_with, BlockConfig, KB, MB, NB};

/// Values swept by the tuning groups.
#[derive(Debug, Clone)]
struct TuningConfig {
    tile_values: Vec<usize>,
    reduction_values: Vec<usize>,
}

impl TuningConfig {
    fn standard() -> Self {
        Self {
            tile_values: vec![32, 48, 64, 96, 128, 192],
            reduction_values: vec![64, 128, 256, 512],
        }
    }
}

fn create_matrix(n: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..n * n).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn bench_tiles(c: &mut Criterion) {
    let tuning = TuningConfig::standard();

    for n in [512, 1024] {
        let mut group = c.benchmark_group(format!("tiles_{n}"));
        group.sample_size(10);

        let mut rng = StdRng::seed_from_u64(42);
        let a = create_matrix(n, &mut rng);
        let b = create_matrix(n, &mut rng);
        let mut out = vec![0.0; n * n];

        for &mb in &tuning.tile_values {
            for &nb in &tuning.tile_values {
                let Ok(config) = BlockConfig::new(mb, nb, KB) else {
                    continue;
                };
                group.bench_with_input(
                    BenchmarkId::new("params", format!("MB{mb}_NB{nb}")),
                    &config,
                    |bench, config| {
                        bench.iter(|| {
                            gemm_blocked_with(
                                black_box(n),
                                black_box(&a),
                                black_box(&b),
                                black_box(&mut out),
                                config,
                            );
                            black_box(&out);
                        });
                    },
                );
            }
        }

        group.finish();
    }
}

fn bench_reduction_depth(c: &mut Criterion) {
    let tuning = TuningConfig::standard();
    let n = 1024;

    let mut group = c.benchmark_group(format!("reduction_{n}"));
    group.sample_size(10);

    let mut rng = StdRng::seed_from_u64(42);
    let a = create_matrix(n, &mut rng);
    let b = create_matrix(n, &mut rng);
    let mut out = vec![0.0; n * n];

    for &kb in &tuning.reduction_values {
        let Ok(config) = BlockConfig::new(MB, NB, kb) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("KB", kb), &config, |bench, config| {
            bench.iter(|| {
                gemm_blocked_with(
                    black_box(n),
                    black_box(&a),
                    black_box(&b),
                    black_box(&mut out),
                    config,
                );
                black_box(&out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tiles, bench_reduction_depth);
criterion_main!(benches);
