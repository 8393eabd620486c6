use ndarray::linalg::general_mat_mul;
use ndarray::{ArrayView2, ArrayViewMut2};

use crate::error::{validation_error, Result};

/// A trusted dense multiply used to produce expected results.
///
/// Implementations must be independent of the kernels under test. The
/// kernels never call an oracle.
pub trait DenseOracle: Send + Sync {
    fn name(&self) -> &'static str;

    /// Overwrites the first `n * n` elements of `c` with `A * B`
    /// (alpha = 1, beta = 0, row-major).
    fn multiply(&self, n: usize, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()>;
}

/// Reference product through `ndarray`'s packed GEMM.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayOracle;

impl DenseOracle for NdarrayOracle {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn multiply(&self, n: usize, a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
        let len = n * n;
        for (label, got) in [("A", a.len()), ("B", b.len()), ("C", c.len())] {
            if got < len {
                return Err(validation_error(format!(
                    "{label}: expected at least {len} elements, got {got}"
                )));
            }
        }

        let shape_err = |e: ndarray::ShapeError| validation_error(e.to_string());
        let a = ArrayView2::from_shape((n, n), &a[..len]).map_err(shape_err)?;
        let b = ArrayView2::from_shape((n, n), &b[..len]).map_err(shape_err)?;
        let mut c = ArrayViewMut2::from_shape((n, n), &mut c[..len]).map_err(shape_err)?;

        general_mat_mul(1.0, &a, &b, 0.0, &mut c);
        Ok(())
    }
}
