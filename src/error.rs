//! Error types for tilegemm.
//!
//! The kernels themselves never fail; these errors belong to the pieces
//! around them: buffer allocation, configuration, thread pool setup and the
//! numerical checks of the correctness harness.

use thiserror::Error;

/// Errors that can occur around the GEMM kernels.
#[derive(Debug, Error)]
pub enum GemmError {
    /// Memory allocation failed.
    #[error(
        "Memory allocation failed: {message} (requested {requested_size} bytes with {requested_alignment} byte alignment)"
    )]
    Allocation {
        /// The size that was requested to be allocated.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Invalid layout parameters were provided.
    #[error("Invalid memory layout: {message} (size: {size}, alignment: {alignment})")]
    Layout {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Input or configuration validation error.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },
    /// A kernel result disagreed with the reference beyond tolerance.
    #[error("[FAIL {label}] mismatch at ({row},{col}): got={got} ref={expected} abs={abs} rel={rel}")]
    Mismatch {
        label: String,
        row: usize,
        col: usize,
        got: f32,
        expected: f32,
        abs: f64,
        rel: f64,
    },
    #[error("thread pool setup failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for tilegemm operations.
pub type Result<T> = std::result::Result<T, GemmError>;

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> GemmError {
    GemmError::Allocation {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> GemmError {
    GemmError::Layout {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> GemmError {
    GemmError::Validation {
        message: message.into(),
    }
}
