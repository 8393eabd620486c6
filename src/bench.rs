//! Wall-clock throughput of a single kernel invocation.
//!
//! Every trial allocates fresh aligned buffers, runs the kernel once to warm
//! caches and the pool, then times exactly one more call.

use std::time::Instant;

use chrono::Utc;
use statrs::statistics::{Data, Median, Statistics};
use tracing::debug;

use crate::config::BlockConfig;
use crate::error::{validation_error, Result};
use crate::gemm::{flops, Variant};
use crate::utils::AlignedBuf;
use crate::verify::fixtures::{fill_ones, fill_pattern};
use crate::verify::DenseOracle;

/// Column names of [`Trial::csv_row`].
pub const CSV_HEADER: &str = "variant,n,threads,flops,time_s,gflops,date";

/// One timed kernel call.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub variant: Variant,
    pub n: usize,
    pub threads: usize,
    pub flops: f64,
    pub time_s: f64,
    pub gflops: f64,
    /// Unix timestamp (seconds) at which the trial finished.
    pub timestamp: i64,
}

impl Trial {
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{:.0},{:.6},{:.3},{}",
            self.variant, self.n, self.threads, self.flops, self.time_s, self.gflops, self.timestamp
        )
    }
}

/// GFLOP/s rate of `n x n` product finishing in `seconds`.
pub fn gflops(n: usize, seconds: f64) -> f64 {
    flops(n) / seconds / 1e9
}

/// Times one call of `variant` on pattern-filled `n x n` inputs, after a
/// warm-up call. Runs on the caller's Rayon pool.
pub fn time_once(variant: Variant, n: usize, config: &BlockConfig) -> Result<f64> {
    let mut a = AlignedBuf::square(n)?;
    let mut b = AlignedBuf::square(n)?;
    let mut c = AlignedBuf::square(n)?;
    fill_pattern(&mut a);
    fill_pattern(&mut b);

    variant.run(n, &a, &b, &mut c, config);

    let start = Instant::now();
    variant.run(n, &a, &b, &mut c, config);
    let elapsed = start.elapsed().as_secs_f64();

    debug!(%variant, n, elapsed, "timed kernel");
    Ok(elapsed)
}

/// One [`time_once`] measurement recorded as a [`Trial`].
pub fn run_trial(variant: Variant, n: usize, config: &BlockConfig) -> Result<Trial> {
    if n == 0 {
        return Err(validation_error("benchmark size must be positive"));
    }

    let time_s = time_once(variant, n, config)?;
    Ok(Trial {
        variant,
        n,
        threads: rayon::current_num_threads(),
        flops: flops(n),
        time_s,
        gflops: gflops(n, time_s),
        timestamp: Utc::now().timestamp(),
    })
}

/// Runs `trials` independent measurements.
pub fn run_trials(
    variant: Variant,
    n: usize,
    trials: usize,
    config: &BlockConfig,
) -> Result<Vec<Trial>> {
    (0..trials).map(|_| run_trial(variant, n, config)).collect()
}

/// Spread of GFLOP/s across trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSummary {
    pub trials: usize,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two trials.
    pub std_dev: f64,
}

impl std::fmt::Display for TrialSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trials={} GFLOP/s min={:.2} median={:.2} mean={:.2} max={:.2} sd={:.2}",
            self.trials, self.min, self.median, self.mean, self.max, self.std_dev
        )
    }
}

/// Summarises the GFLOP/s of `trials`, or `None` if there are none.
pub fn summarize(trials: &[Trial]) -> Option<TrialSummary> {
    if trials.is_empty() {
        return None;
    }
    let rates: Vec<f64> = trials.iter().map(|t| t.gflops).collect();

    Some(TrialSummary {
        trials: rates.len(),
        min: Statistics::min(rates.iter()),
        max: Statistics::max(rates.iter()),
        median: Data::new(rates.clone()).median(),
        mean: Statistics::mean(rates.iter()),
        std_dev: Statistics::std_dev(rates.iter()),
    })
}

/// Times the reference oracle on all-ones inputs: `warmups` untimed calls,
/// then one timed call. Returns `(seconds, GFLOP/s)`.
pub fn time_oracle(oracle: &dyn DenseOracle, n: usize, warmups: usize) -> Result<(f64, f64)> {
    if n == 0 {
        return Err(validation_error("benchmark size must be positive"));
    }

    let mut a = AlignedBuf::square(n)?;
    let mut b = AlignedBuf::square(n)?;
    let mut c = AlignedBuf::square(n)?;
    fill_ones(&mut a);
    fill_ones(&mut b);

    for _ in 0..warmups {
        oracle.multiply(n, &a, &b, &mut c)?;
    }

    let start = Instant::now();
    oracle.multiply(n, &a, &b, &mut c)?;
    let elapsed = start.elapsed().as_secs_f64();

    Ok((elapsed, gflops(n, elapsed)))
}
