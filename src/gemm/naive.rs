use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use tracing::debug;

use super::{assert_square_buffers, SquareGemm};

/// Textbook `i-j-k` product, parallel over rows of C.
///
/// Each output element is a single running sum over `k` in increasing order,
/// so the result is bit-identical no matter how many threads run it. Rows of
/// C are handed to Rayon as disjoint `&mut` chunks; no synchronisation is
/// needed between them.
///
/// # Panics
///
/// Panics if any buffer holds fewer than `n * n` elements.
pub fn gemm_naive(n: usize, a: &[f32], b: &[f32], c: &mut [f32]) {
    if n == 0 {
        return;
    }
    assert_square_buffers(n, a, b, c);
    debug!(n, "gemm_naive");

    c[..n * n]
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(i, c_row)| {
            let a_row = &a[i * n..(i + 1) * n];
            for (j, c_ij) in c_row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for (k, &a_ik) in a_row.iter().enumerate() {
                    sum += a_ik * b[k * n + j];
                }
                *c_ij = sum;
            }
        });
}

/// [`gemm_naive`] behind the [`SquareGemm`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveGemm;

impl SquareGemm for NaiveGemm {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn compute_product(&self, n: usize, a: &[f32], b: &[f32], c: &mut [f32]) {
        gemm_naive(n, a, b, c);
    }
}
