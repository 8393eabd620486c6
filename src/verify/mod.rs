//! Correctness checking against an independent dense multiply.
//!
//! Nothing here is used by the kernels. The harness allocates aligned
//! buffers, fills them from fixed seeds, runs every kernel and the oracle on
//! the same inputs and compares elementwise within [`close::ATOL`] /
//! [`close::RTOL`].

pub mod close;
pub mod fixtures;
pub mod oracle;
pub mod suite;

pub use close::{check_close, CloseReport};
pub use oracle::{DenseOracle, NdarrayOracle};
pub use suite::{CaseKind, CaseOutcome, Harness, SuiteReport};
