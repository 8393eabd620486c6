//! Tile sizes for the blocked kernel.

use crate::error::{validation_error, Result};
use crate::{KB, MB, NB};

/// Tile dimensions used by [`crate::gemm_blocked_with`].
///
/// None of the sizes has to divide `n`: the last block in each dimension is
/// clipped to whatever extent remains. A size larger than `n` degenerates to
/// a single block in that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockConfig {
    row_block: usize,
    col_block: usize,
    reduction_block: usize,
}

impl BlockConfig {
    /// Builds a configuration, rejecting zero-sized blocks.
    pub fn new(row_block: usize, col_block: usize, reduction_block: usize) -> Result<Self> {
        for (name, value) in [
            ("row_block", row_block),
            ("col_block", col_block),
            ("reduction_block", reduction_block),
        ] {
            if value == 0 {
                return Err(validation_error(format!("{name} must be positive")));
            }
        }

        Ok(Self {
            row_block,
            col_block,
            reduction_block,
        })
    }

    /// Tile height: rows of C owned by one work unit.
    #[inline]
    pub fn row_block(&self) -> usize {
        self.row_block
    }

    /// Tile width: columns of C owned by one work unit.
    #[inline]
    pub fn col_block(&self) -> usize {
        self.col_block
    }

    /// Tile depth: reduction steps folded into C per pass.
    #[inline]
    pub fn reduction_block(&self) -> usize {
        self.reduction_block
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            row_block: MB,
            col_block: NB,
            reduction_block: KB,
        }
    }
}

impl std::fmt::Display for BlockConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MB={} NB={} KB={}",
            self.row_block, self.col_block, self.reduction_block
        )
    }
}
