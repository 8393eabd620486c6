//! Cache-blocked square GEMM.
//!
//! The output is cut into `row_block x col_block` tiles. Each tile is one
//! unit of parallel work and is owned by exactly one worker for the whole
//! call. Inside a tile the reduction dimension is walked in
//! `reduction_block`-deep slabs, in increasing order:
//!
//! ```text
//! for each tile (ii, jj)                  -- parallel, flat over both block dims
//!     for kk in reduction blocks          -- sequential, increasing
//!         for i in ii, for j in jj:
//!             sum = (kk == 0) ? 0 : C[i][j]
//!             for k in kk: sum += A[i][k] * B[k][j]
//!             C[i][j] = sum
//! ```
//!
//! The first slab starts each element from zero, so stale contents of C
//! never leak into the result. Later slabs reload the partial sum that the
//! same worker stored on the previous pass. C is therefore touched once per
//! slab per element rather than once per multiply-add.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use super::tiling::{block_ranges, Tile, TileGrid};
use super::{assert_square_buffers, SquareGemm};
use crate::config::BlockConfig;

/// Blocked product with the default tile sizes ([`crate::MB`], [`crate::NB`],
/// [`crate::KB`]).
///
/// # Panics
///
/// Panics if any buffer holds fewer than `n * n` elements.
pub fn gemm_blocked(n: usize, a: &[f32], b: &[f32], c: &mut [f32]) {
    gemm_blocked_with(n, a, b, c, &BlockConfig::default());
}

/// Blocked product with explicit tile sizes.
///
/// Results agree with [`crate::gemm_naive`] up to the reordering of
/// floating-point additions across reduction slabs. For a fixed `config`
/// the output is bit-identical across runs and thread counts.
///
/// # Panics
///
/// Panics if any buffer holds fewer than `n * n` elements.
pub fn gemm_blocked_with(n: usize, a: &[f32], b: &[f32], c: &mut [f32], config: &BlockConfig) {
    if n == 0 {
        return;
    }
    assert_square_buffers(n, a, b, c);

    let grid = TileGrid::new(n, config);
    debug!(
        n,
        row_block = config.row_block(),
        col_block = config.col_block(),
        reduction_block = config.reduction_block(),
        tiles = grid.len(),
        "gemm_blocked"
    );

    let out = SharedOut::new(&mut c[..n * n]);
    let kb = config.reduction_block();

    (0..grid.len()).into_par_iter().for_each(|t| {
        let tile = grid.tile(t);
        // SAFETY: tiles of one grid are pairwise disjoint, and `t` is
        // visited by exactly one worker.
        unsafe { compute_tile(n, a, b, &out, &tile, kb) };
    });
}

/// Computes every element of `tile` into `out`.
///
/// # Safety
///
/// No other thread may read or write any element of `tile` in `out` while
/// this runs.
unsafe fn compute_tile(n: usize, a: &[f32], b: &[f32], out: &SharedOut, tile: &Tile, kb: usize) {
    for kk in block_ranges(n, kb) {
        let first = kk.start == 0;

        for i in tile.rows.clone() {
            let a_row = &a[i * n + kk.start..i * n + kk.end];
            let c_seg = out.segment(i * n + tile.cols.start, tile.cols.len());

            for (c_ij, j) in c_seg.iter_mut().zip(tile.cols.clone()) {
                let mut sum = if first { 0.0f32 } else { *c_ij };
                for (a_ik, k) in a_row.iter().zip(kk.clone()) {
                    sum += a_ik * b[k * n + j];
                }
                *c_ij = sum;
            }
        }
    }
}

/// Shared handle to the output buffer, split between workers by tile.
///
/// The borrow of C is held by [`gemm_blocked_with`] for the whole parallel
/// region, which ends before it returns.
struct SharedOut {
    ptr: *mut f32,
    len: usize,
}

// SAFETY: workers only ever dereference disjoint ranges (see `segment`).
unsafe impl Send for SharedOut {}
unsafe impl Sync for SharedOut {}

impl SharedOut {
    fn new(c: &mut [f32]) -> Self {
        Self {
            ptr: c.as_mut_ptr(),
            len: c.len(),
        }
    }

    /// Mutable view of `out[start..start + len]`.
    ///
    /// # Safety
    ///
    /// The caller must have exclusive access to that range for the lifetime
    /// of the returned slice.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn segment(&self, start: usize, len: usize) -> &mut [f32] {
        debug_assert!(start + len <= self.len);
        std::slice::from_raw_parts_mut(self.ptr.add(start), len)
    }
}

/// [`gemm_blocked_with`] behind the [`SquareGemm`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedGemm {
    config: BlockConfig,
}

impl BlockedGemm {
    pub fn new(config: BlockConfig) -> Self {
        Self { config }
    }
}

impl SquareGemm for BlockedGemm {
    fn name(&self) -> &'static str {
        "blocked"
    }

    fn compute_product(&self, n: usize, a: &[f32], b: &[f32], c: &mut [f32]) {
        gemm_blocked_with(n, a, b, c, &self.config);
    }
}
