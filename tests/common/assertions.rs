//! Assertion utilities for testing.
//!
//! Floating-point comparisons and level-scale checks.

#![allow(dead_code)]

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two slices are approximately element-wise equal.
pub fn assert_array_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arrays have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
        assert!(
            (a - e).abs() <= eps,
            "Arrays differ at index {}: actual = {}, expected = {}, epsilon = {}",
            i,
            a,
            e,
            eps
        );
    }
}

/// Assert that levels are strictly increasing with one constant step whose
/// mantissa is a round multiple (20, 25, 40, 50, ..., 100 times a power of ten).
pub fn assert_nice_levels(levels: &[f64]) {
    assert!(levels.len() >= 2, "Too few levels: {:?}", levels);
    let step = levels[1] - levels[0];
    assert!(step > 0.0, "Levels not increasing: {:?}", levels);

    for pair in levels.windows(2) {
        let diff = pair[1] - pair[0];
        assert!(
            (diff - step).abs() <= step * 1e-6,
            "Uneven level spacing {} vs {} in {:?}",
            diff,
            step,
            levels
        );
    }

    let exponent = step.log10().floor() as i32 - 1;
    let mut mantissa = step / 10f64.powi(exponent);
    if mantissa <= 10.0 + 1e-6 {
        mantissa *= 10.0;
    }
    let nice = [20.0, 25.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
    assert!(
        nice.iter().any(|n| (mantissa - n).abs() < 1e-6),
        "Step {} (mantissa {}) is not a round multiple",
        step,
        mantissa
    );
}

/// Assert that a result is within expected bounds.
pub fn assert_in_range(actual: f64, min: f64, max: f64) {
    assert!(
        actual >= min && actual <= max,
        "Value not in range: actual = {}, min = {}, max = {}",
        actual,
        min,
        max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_nice_levels() {
        assert_nice_levels(&[0.0, 25.0, 50.0, 75.0]);
        assert_nice_levels(&[94500.0, 95200.0, 95900.0]);
        assert_nice_levels(&[-0.2, 0.0, 0.2]);
    }

    #[test]
    #[should_panic]
    fn test_uneven_levels_rejected() {
        assert_nice_levels(&[0.0, 1.0, 3.0]);
    }
}
