//! The two square GEMM kernels and the contract they share.
//!
//! Both kernels compute `C = A * B` for `n x n` row-major `f32` matrices.
//! `C` is overwritten, never accumulated into. A, B and C must each hold at
//! least `n * n` elements; anything shorter is a caller bug and panics.

use std::fmt;
use std::str::FromStr;

use crate::config::BlockConfig;
use crate::error::{validation_error, GemmError};

pub mod blocked;
pub mod naive;
pub mod tiling;

use blocked::BlockedGemm;
use naive::NaiveGemm;

/// A square single-precision matrix multiply, `C = A * B`.
///
/// Implementations run on the Rayon pool of the calling thread and return
/// only once every element of C has been written.
pub trait SquareGemm: Send + Sync {
    /// Short name used in reports and CSV output.
    fn name(&self) -> &'static str;

    /// Overwrites the first `n * n` elements of `c` with `A * B`.
    fn compute_product(&self, n: usize, a: &[f32], b: &[f32], c: &mut [f32]);
}

/// Selects one of the two kernels by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Naive,
    Blocked,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Naive, Variant::Blocked];

    /// The name the benchmark driver prints in its CSV rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Naive => "baseline",
            Variant::Blocked => "blocked",
        }
    }

    /// Runs the selected kernel. `config` is ignored by the naive kernel.
    pub fn run(self, n: usize, a: &[f32], b: &[f32], c: &mut [f32], config: &BlockConfig) {
        match self {
            Variant::Naive => naive::gemm_naive(n, a, b, c),
            Variant::Blocked => blocked::gemm_blocked_with(n, a, b, c, config),
        }
    }

    /// Boxes the selected kernel behind the shared trait.
    pub fn kernel(self, config: BlockConfig) -> Box<dyn SquareGemm> {
        match self {
            Variant::Naive => Box::new(NaiveGemm),
            Variant::Blocked => Box::new(BlockedGemm::new(config)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = GemmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" | "naive" => Ok(Variant::Naive),
            "blocked" | "tiled" => Ok(Variant::Blocked),
            other => Err(validation_error(format!(
                "unknown variant '{other}' (expected baseline or blocked)"
            ))),
        }
    }
}

/// Floating-point operations in one `n x n` product: `2 * n^3`.
#[inline]
pub fn flops(n: usize) -> f64 {
    let n = n as f64;
    2.0 * n * n * n
}

/// Panics unless every buffer can hold an `n x n` matrix.
#[inline]
pub(crate) fn assert_square_buffers(n: usize, a: &[f32], b: &[f32], c: &[f32]) {
    let len = n
        .checked_mul(n)
        .unwrap_or_else(|| panic!("n={n}: n*n overflows usize"));
    assert!(a.len() >= len, "A: expected at least {len} elements, got {}", a.len());
    assert!(b.len() >= len, "B: expected at least {len} elements, got {}", b.len());
    assert!(c.len() >= len, "C: expected at least {len} elements, got {}", c.len());
}
