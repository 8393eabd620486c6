use crate::error::{GemmError, Result};

/// Default absolute tolerance of the correctness checks.
pub const ATOL: f32 = 1e-3;
/// Default relative tolerance of the correctness checks.
pub const RTOL: f32 = 1e-3;

/// Guards the relative error against division by an exact zero.
const REL_FLOOR: f64 = 1e-12;

/// Summary of a passing comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseReport {
    pub label: String,
    pub max_abs: f64,
    pub max_rel: f64,
    /// Position of the largest absolute error; `None` when every element
    /// matched exactly.
    pub worst: Option<(usize, usize)>,
}

impl std::fmt::Display for CloseReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (i, j) = match self.worst {
            Some((i, j)) => (i as i64, j as i64),
            None => (-1, -1),
        };
        write!(
            f,
            "[OK {}] max_abs={} max_rel={} (worst at {},{})",
            self.label,
            Sci(self.max_abs),
            Sci(self.max_rel),
            i,
            j
        )
    }
}

/// Scientific notation, except that an exact zero prints as `0`.
struct Sci(f64);

impl std::fmt::Display for Sci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{:e}", self.0)
        }
    }
}

/// Compares the leading `n x n` elements of `got` against `expected`.
///
/// An element passes when its absolute error is within `atol` **or** its
/// relative error is within `rtol`. Errors are computed in `f64`. The first
/// failing element in row-major order is reported as
/// [`GemmError::Mismatch`].
pub fn check_close(
    got: &[f32],
    expected: &[f32],
    n: usize,
    atol: f32,
    rtol: f32,
    label: &str,
) -> Result<CloseReport> {
    let mut max_abs = 0.0f64;
    let mut max_rel = 0.0f64;
    let mut worst = None;

    for i in 0..n {
        for j in 0..n {
            let idx = i * n + j;
            let (g, e) = (got[idx], expected[idx]);
            let abs = (g as f64 - e as f64).abs();
            let rel = abs / ((e as f64).abs() + REL_FLOOR);

            if abs > max_abs {
                max_abs = abs;
                worst = Some((i, j));
            }
            max_rel = max_rel.max(rel);

            // Written as a negation so NaN fails.
            if !(abs <= atol as f64 || rel <= rtol as f64) {
                return Err(GemmError::Mismatch {
                    label: label.to_string(),
                    row: i,
                    col: j,
                    got: g,
                    expected: e,
                    abs,
                    rel,
                });
            }
        }
    }

    Ok(CloseReport {
        label: label.to_string(),
        max_abs,
        max_rel,
        worst,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_buffers_pass() {
        let x = [1.0f32, -2.0, 3.5, 0.0];
        let report = check_close(&x, &x, 2, ATOL, RTOL, "same").unwrap();
        assert_eq!(report.max_abs, 0.0);
        assert_eq!(report.max_rel, 0.0);
        assert_eq!(report.worst, None);
        assert_eq!(
            report.to_string(),
            "[OK same] max_abs=0 max_rel=0 (worst at -1,-1)"
        );
    }

    #[test]
    fn test_worst_tracks_first_largest_error() {
        let expected = [1.0f32, 1.0, 1.0, 1.0];
        let got = [1.0f32, 1.0005, 1.0, 1.0005];
        let report = check_close(&got, &expected, 2, ATOL, RTOL, "worst").unwrap();
        // Ties keep the earlier position.
        assert_eq!(report.worst, Some((0, 1)));
        assert!(report.to_string().ends_with("(worst at 0,1)"));
    }

    #[test]
    fn test_relative_bound_alone_accepts_large_values() {
        // abs error 0.5 is far over ATOL, but rel error 5e-4 is within RTOL.
        let got = [1000.5f32];
        let expected = [1000.0f32];
        let report = check_close(&got, &expected, 1, ATOL, RTOL, "rel").unwrap();
        assert!(report.max_abs > ATOL as f64);
    }

    #[test]
    fn test_absolute_bound_alone_accepts_near_zero() {
        // rel error is huge against a zero reference, abs error is tiny.
        let got = [5e-4f32];
        let expected = [0.0f32];
        check_close(&got, &expected, 1, ATOL, RTOL, "abs").unwrap();
    }

    #[test]
    fn test_first_mismatch_is_reported() {
        let expected = [1.0f32, 1.0, 1.0, 1.0];
        let got = [1.0f32, 1.0, 2.0, 3.0];
        let err = check_close(&got, &expected, 2, ATOL, RTOL, "bad").unwrap_err();
        match err {
            GemmError::Mismatch {
                label,
                row,
                col,
                got,
                expected,
                ..
            } => {
                assert_eq!(label, "bad");
                assert_eq!((row, col), (1, 0));
                assert_eq!(got, 2.0);
                assert_eq!(expected, 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_fails() {
        let err = check_close(&[f32::NAN], &[1.0], 1, ATOL, RTOL, "nan").unwrap_err();
        assert!(matches!(err, GemmError::Mismatch { .. }));
    }

    #[test]
    fn test_report_display() {
        let report = CloseReport {
            label: "blocked".into(),
            max_abs: 0.0,
            max_rel: 0.0,
            worst: None,
        };
        assert!(report.to_string().starts_with("[OK blocked]"));
        assert!(report.to_string().ends_with("(worst at -1,-1)"));
    }
}
