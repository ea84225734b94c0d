//! Display and true data range estimation.
//!
//! Missing values are NaN and ±inf. The display range may be clipped to
//! explicit bounds and quantiles; the true range is always the unclipped
//! pool extremes and drives the overflow-arrow decision.

use ndarray::{ArrayD, ArrayViewD};
use tracing::debug;

use crate::error::{GplotError, Result};

/// Resolved value range of one or more arrays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub display_min: f64,
    pub display_max: f64,
    pub true_min: f64,
    pub true_max: f64,
}

impl ValueRange {
    /// True data extends below the display range
    pub fn exceeds_below(&self) -> bool {
        self.true_min < self.display_min
    }

    /// True data extends above the display range
    pub fn exceeds_above(&self) -> bool {
        self.true_max > self.display_max
    }
}

/// Mask of missing (non-finite) cells
pub fn missing_mask(slab: ArrayViewD<'_, f64>) -> ArrayD<bool> {
    slab.mapv(|v| !v.is_finite())
}

/// Collect every finite value of every array into one pool
pub fn pool_finite(arrays: &[ArrayViewD<'_, f64>]) -> Vec<f64> {
    arrays
        .iter()
        .flat_map(|a| a.iter().copied())
        .filter(|v| v.is_finite())
        .collect()
}

/// Quantile of an ascending, non-empty slice with linear interpolation
/// between order statistics (`pos = q * (n - 1)`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = pos - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

/// Quantiles of a pool of values; non-finite entries are ignored.
pub fn quantiles(values: &[f64], qs: &[f64]) -> Result<Vec<f64>> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(GplotError::DataNotFound {
            message: "No finite values to compute quantiles from".to_string(),
        });
    }
    for &q in qs {
        check_fraction("q", q)?;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect())
}

fn check_fraction(name: &str, q: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&q) {
        return Err(GplotError::config(format!(
            "Quantile fraction {} must lie in [0, 1], got {}",
            name, q
        )));
    }
    Ok(())
}

/// Validate a pair of quantile clip fractions.
///
/// Both must lie in `[0, 1]`, and when both are given `q_lo < q_hi` is
/// rejected.
pub fn validate_quantiles(q_lo: Option<f64>, q_hi: Option<f64>) -> Result<()> {
    if let Some(q) = q_lo {
        check_fraction("ql", q)?;
    }
    if let Some(q) = q_hi {
        check_fraction("qr", q)?;
    }
    if let (Some(lo), Some(hi)) = (q_lo, q_hi) {
        if lo < hi {
            return Err(GplotError::config(format!(
                "ql ({}) must not be less than qr ({})",
                lo, hi
            )));
        }
    }
    Ok(())
}

/// Compute the display and true ranges of a set of arrays.
///
/// # Arguments
///
/// * `arrays` - Arrays pooled together; missing values are excluded
/// * `explicit_min`, `explicit_max` - Caller bounds, clamped to the data
///   extremes so a loose bound never widens the display range
/// * `q_lo` - Fraction excluded from below (quantile taken at `q_lo`)
/// * `q_hi` - Fraction excluded from above (quantile taken at `1 - q_hi`)
pub fn compute_range(
    arrays: &[ArrayViewD<'_, f64>],
    explicit_min: Option<f64>,
    explicit_max: Option<f64>,
    q_lo: Option<f64>,
    q_hi: Option<f64>,
) -> Result<ValueRange> {
    if let Some(q) = q_lo {
        check_fraction("ql", q)?;
    }
    if let Some(q) = q_hi {
        check_fraction("qr", q)?;
    }

    let mut pool = pool_finite(arrays);
    if pool.is_empty() {
        return Err(GplotError::DataNotFound {
            message: "All values are missing".to_string(),
        });
    }
    pool.sort_by(|a, b| a.total_cmp(b));
    let true_min = pool[0];
    let true_max = pool[pool.len() - 1];

    let lo_quantile = q_lo.map(|q| {
        let value = quantile_sorted(&pool, q);
        debug!(q = q, value = value, "Lower quantile");
        value
    });
    let hi_quantile = q_hi.map(|q| {
        let value = quantile_sorted(&pool, 1.0 - q);
        debug!(q = 1.0 - q, value = value, "Upper quantile");
        value
    });

    let explicit_min = explicit_min.map(|e| e.max(true_min));
    let explicit_max = explicit_max.map(|e| e.min(true_max));
    let mut display_min = match (explicit_min, lo_quantile) {
        (Some(e), Some(q)) => e.max(q),
        (Some(e), None) => e,
        (None, Some(q)) => q,
        (None, None) => true_min,
    };
    let mut display_max = match (explicit_max, hi_quantile) {
        (Some(e), Some(q)) => e.min(q),
        (Some(e), None) => e,
        (None, Some(q)) => q,
        (None, None) => true_max,
    };
    if display_max < display_min {
        std::mem::swap(&mut display_min, &mut display_max);
    }

    debug!(
        display_min = display_min,
        display_max = display_max,
        true_min = true_min,
        true_max = true_max,
        "Resolved value range"
    );

    Ok(ValueRange {
        display_min,
        display_max,
        true_min,
        true_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array1};

    fn one_to_hundred() -> Array1<f64> {
        Array1::from_iter((1..=100).map(|v| v as f64))
    }

    #[test]
    fn test_explicit_min_beats_quantile() {
        let data = one_to_hundred();
        let r = compute_range(&[data.view().into_dyn()], Some(10.0), None, Some(0.05), None).unwrap();
        // 5th percentile of 1..=100 is 5.95
        assert_eq!(r.display_min, 10.0);
        assert_eq!(r.display_max, 100.0);
        assert_eq!(r.true_min, 1.0);
        assert_eq!(r.true_max, 100.0);
    }

    #[test]
    fn test_quantile_beats_loose_explicit_bounds() {
        let data = one_to_hundred();
        let r = compute_range(&[data.view().into_dyn()], Some(2.0), Some(99.5), Some(0.05), Some(0.05))
            .unwrap();
        assert!((r.display_min - 5.95).abs() < 1e-9);
        assert!((r.display_max - 95.05).abs() < 1e-9);
        assert!(r.exceeds_below());
        assert!(r.exceeds_above());
    }

    #[test]
    fn test_explicit_bounds_clamped_to_data() {
        let data = one_to_hundred();
        let r = compute_range(&[data.view().into_dyn()], Some(-50.0), Some(500.0), None, None).unwrap();
        assert_eq!(r.display_min, 1.0);
        assert_eq!(r.display_max, 100.0);
        assert!(!r.exceeds_below() && !r.exceeds_above());
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let data = one_to_hundred();
        let r = compute_range(&[data.view().into_dyn()], Some(80.0), Some(20.0), None, None).unwrap();
        assert_eq!(r.display_min, 20.0);
        assert_eq!(r.display_max, 80.0);
    }

    #[test]
    fn test_missing_values_are_pooled_out() {
        let a = arr2(&[[f64::NAN, 1.0], [2.0, f64::INFINITY]]);
        let b = arr1(&[-4.0, f64::NEG_INFINITY]);
        let r = compute_range(&[a.view().into_dyn(), b.view().into_dyn()], None, None, None, None)
            .unwrap();
        assert_eq!(r.true_min, -4.0);
        assert_eq!(r.true_max, 2.0);

        let mask = missing_mask(a.view().into_dyn());
        assert_eq!(mask.iter().filter(|&&m| m).count(), 2);
    }

    #[test]
    fn test_all_missing_is_error() {
        let a = arr1(&[f64::NAN, f64::NAN]);
        assert!(matches!(
            compute_range(&[a.view().into_dyn()], None, None, None, None),
            Err(GplotError::DataNotFound { .. })
        ));
    }

    #[test]
    fn test_quantile_fraction_bounds() {
        let data = one_to_hundred();
        assert!(compute_range(&[data.view().into_dyn()], None, None, Some(1.5), None).is_err());
        assert!(validate_quantiles(Some(-0.1), None).is_err());
        assert!(validate_quantiles(Some(0.005), Some(0.001)).is_ok());
        assert!(validate_quantiles(Some(0.001), Some(0.005)).is_err());
        assert!(validate_quantiles(None, Some(0.3)).is_ok());
    }

    #[test]
    fn test_quantiles_helper() {
        let q = quantiles(&[3.0, 1.0, 2.0, f64::NAN], &[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(q, vec![1.0, 2.0, 3.0]);
    }
}
