use std::fmt;

use tracing::{info, warn};

use super::close::{check_close, CloseReport, ATOL, RTOL};
use super::fixtures::{b_seed, case_seed, fill_identity, fill_random, IDENTITY_SEED};
use super::oracle::DenseOracle;
use crate::config::BlockConfig;
use crate::error::Result;
use crate::gemm::{SquareGemm, Variant};
use crate::utils::AlignedBuf;

/// Sizes of the random-operand cases. 31 exercises ragged tails.
pub const SUITE_SIZES: [usize; 4] = [8, 16, 31, 64];
/// Sizes of the `A * I` / `I * A` cases.
pub const IDENTITY_SIZES: [usize; 2] = [16, 33];

/// Which fixture produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// Seeded random A and B.
    Random,
    /// `A * I` or `I * A`.
    Identity,
}

/// One kernel compared against the oracle on one input.
#[derive(Debug)]
pub struct CaseOutcome {
    pub label: String,
    pub n: usize,
    pub kind: CaseKind,
    pub result: Result<CloseReport>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// The `check` report: a header before each random size, one `[OK ..]` or
/// `[FAIL ..]` line per outcome, then the verdict.
impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last_n = None;
        for outcome in &self.outcomes {
            if outcome.kind == CaseKind::Random && last_n != Some(outcome.n) {
                last_n = Some(outcome.n);
                writeln!(f, "== correctness n={} ==", outcome.n)?;
            }
            match &outcome.result {
                Ok(report) => writeln!(f, "{report}")?,
                Err(err) => writeln!(f, "{err}")?,
            }
        }

        if self.passed() {
            write!(f, "ALL UNIT TESTS PASSED")
        } else {
            write!(f, "UNIT TESTS FAILED")
        }
    }
}

/// Runs both kernels against `oracle` under one tile configuration.
pub struct Harness<'a> {
    oracle: &'a dyn DenseOracle,
    kernels: Vec<Box<dyn SquareGemm>>,
    atol: f32,
    rtol: f32,
}

impl<'a> Harness<'a> {
    pub fn new(oracle: &'a dyn DenseOracle, config: BlockConfig) -> Self {
        Self {
            oracle,
            kernels: Variant::ALL.iter().map(|v| v.kernel(config)).collect(),
            atol: ATOL,
            rtol: RTOL,
        }
    }

    pub fn with_tolerance(mut self, atol: f32, rtol: f32) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }

    /// Random A and B derived from `seed`.
    ///
    /// Errors only if buffers cannot be allocated or the oracle fails; kernel
    /// mismatches are reported in the outcomes.
    pub fn run_case(&self, n: usize, seed: u32) -> Result<Vec<CaseOutcome>> {
        let mut a = AlignedBuf::square(n)?;
        let mut b = AlignedBuf::square(n)?;
        fill_random(&mut a, seed);
        fill_random(&mut b, b_seed(seed));

        self.compare_all(n, &a, &b, CaseKind::Random, "")
    }

    /// `A * I == A` and `I * A == A` for a random A.
    pub fn run_identities(&self, n: usize) -> Result<Vec<CaseOutcome>> {
        let mut id = AlignedBuf::square(n)?;
        let mut a = AlignedBuf::square(n)?;
        fill_identity(&mut id, n);
        fill_random(&mut a, IDENTITY_SEED);

        let mut outcomes = self.compare_all(n, &a, &id, CaseKind::Identity, "A*I ")?;
        outcomes.extend(self.compare_all(n, &id, &a, CaseKind::Identity, "I*A ")?);
        Ok(outcomes)
    }

    /// The full suite: every size in [`SUITE_SIZES`] and [`IDENTITY_SIZES`].
    pub fn run_suite(&self) -> Result<SuiteReport> {
        let mut report = SuiteReport::default();
        for n in SUITE_SIZES {
            report.outcomes.extend(self.run_case(n, case_seed(n))?);
        }
        for n in IDENTITY_SIZES {
            report.outcomes.extend(self.run_identities(n)?);
        }
        Ok(report)
    }

    fn compare_all(
        &self,
        n: usize,
        a: &[f32],
        b: &[f32],
        kind: CaseKind,
        prefix: &str,
    ) -> Result<Vec<CaseOutcome>> {
        let mut expected = AlignedBuf::square(n)?;
        let mut got = AlignedBuf::square(n)?;
        self.oracle.multiply(n, a, b, &mut expected)?;

        let mut outcomes = Vec::with_capacity(self.kernels.len());
        for kernel in &self.kernels {
            got.fill(0.0);
            kernel.compute_product(n, a, b, &mut got);

            let label = format!("{prefix}{}", kernel.name());
            let result = check_close(&got, &expected, n, self.atol, self.rtol, &label);
            match &result {
                Ok(report) => info!(n, oracle = self.oracle.name(), "{report}"),
                Err(err) => warn!(n, oracle = self.oracle.name(), "{err}"),
            }
            outcomes.push(CaseOutcome {
                label,
                n,
                kind,
                result,
            });
        }
        Ok(outcomes)
    }
}
