//! Square single-precision matrix multiplication, two ways.
//!
//! `tilegemm` computes `C = A * B` for `n x n` row-major `f32` matrices with
//! a naive triple loop and with a cache-blocked (tiled) loop nest, both
//! parallelised on Rayon. The [`verify`] module checks them against an
//! independent dense multiply and [`bench`] measures their throughput.
//!
//! ```
//! use tilegemm::{gemm_blocked, gemm_naive};
//!
//! let n = 3;
//! let a = vec![1.0f32; n * n];
//! let b = vec![2.0f32; n * n];
//! let mut c1 = vec![0.0f32; n * n];
//! let mut c2 = vec![0.0f32; n * n];
//!
//! gemm_naive(n, &a, &b, &mut c1);
//! gemm_blocked(n, &a, &b, &mut c2);
//! assert_eq!(c1, vec![6.0; n * n]);
//! assert_eq!(c1, c2);
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod gemm;
pub mod pool;
pub mod utils;
pub mod verify;

/// Default tile height (rows of C per work unit).
pub const MB: usize = 96;
/// Default tile width (columns of C per work unit).
pub const NB: usize = 96;
/// Default tile depth (reduction steps per accumulation pass).
pub const KB: usize = 256;

/// Alignment, in bytes, of the buffers handed out by [`utils::AlignedBuf`].
pub const ALIGNMENT: usize = 64;

pub use config::BlockConfig;
pub use error::{GemmError, Result};
pub use gemm::blocked::{gemm_blocked, gemm_blocked_with, BlockedGemm};
pub use gemm::naive::{gemm_naive, NaiveGemm};
pub use gemm::{flops, SquareGemm, Variant};
pub use pool::PoolConfig;
