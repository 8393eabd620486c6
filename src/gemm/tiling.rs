//! Partitioning of the `n x n` iteration space into blocks.
//!
//! A dimension of extent `n` split by block size `bs` yields
//! `ceil(n / bs)` half-open ranges `[start, min(start + bs, n))`. Only the
//! last range can be short (the tail), and when `bs >= n` there is exactly
//! one range covering everything.

use std::cmp::min;
use std::ops::Range;

use crate::config::BlockConfig;

/// Number of blocks of size `bs` needed to cover `n`.
#[inline]
pub fn block_count(n: usize, bs: usize) -> usize {
    debug_assert!(bs > 0, "block size must be positive");
    n.div_ceil(bs)
}

/// The `index`-th block of size `bs` over `[0, n)`, clipped at `n`.
#[inline]
pub fn block_range(index: usize, bs: usize, n: usize) -> Range<usize> {
    let start = index * bs;
    debug_assert!(start < n, "block {index} starts past the end ({start} >= {n})");
    start..min(start + bs, n)
}

/// All blocks of size `bs` over `[0, n)`, in increasing order.
pub fn block_ranges(n: usize, bs: usize) -> impl Iterator<Item = Range<usize>> {
    debug_assert!(bs > 0, "block size must be positive");
    (0..n).step_by(bs).map(move |start| start..min(start + bs, n))
}

/// One unit of parallel work: the output rectangle `rows x cols` of C.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// The row-block x column-block grid of output tiles.
///
/// Tiles are numbered row-block major: tile `t` covers row block
/// `t / col_blocks` and column block `t % col_blocks`. The flat numbering
/// is what gets distributed across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    n: usize,
    row_block: usize,
    col_block: usize,
    row_blocks: usize,
    col_blocks: usize,
}

impl TileGrid {
    pub fn new(n: usize, config: &BlockConfig) -> Self {
        Self {
            n,
            row_block: config.row_block(),
            col_block: config.col_block(),
            row_blocks: block_count(n, config.row_block()),
            col_blocks: block_count(n, config.col_block()),
        }
    }

    pub fn row_blocks(&self) -> usize {
        self.row_blocks
    }

    pub fn col_blocks(&self) -> usize {
        self.col_blocks
    }

    /// Total number of tiles.
    pub fn len(&self) -> usize {
        self.row_blocks * self.col_blocks
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Output rectangle of tile `t`.
    #[inline]
    pub fn tile(&self, t: usize) -> Tile {
        debug_assert!(t < self.len());
        let ib = t / self.col_blocks;
        let jb = t % self.col_blocks;
        Tile {
            rows: block_range(ib, self.row_block, self.n),
            cols: block_range(jb, self.col_block, self.n),
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.len()).map(move |t| self.tile(t))
    }
}
