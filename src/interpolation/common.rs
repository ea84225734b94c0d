//! Common utilities for interpolation algorithms.

/// Map a coordinate value to a fractional index of a monotonic axis.
///
/// Works for ascending and descending axes; `None` outside the axis.
pub fn coord_to_index(coord: f64, coord_values: &[f64]) -> Option<f64> {
    let n = coord_values.len();
    if n == 0 || !coord.is_finite() {
        return None;
    }
    if n == 1 {
        return (coord == coord_values[0]).then_some(0.0);
    }

    let ascending = coord_values[n - 1] >= coord_values[0];
    let (lo, hi) = if ascending {
        (coord_values[0], coord_values[n - 1])
    } else {
        (coord_values[n - 1], coord_values[0])
    };
    if coord < lo || coord > hi {
        return None;
    }

    // first index whose value passes the coordinate
    let upper = if ascending {
        coord_values.partition_point(|&c| c < coord)
    } else {
        coord_values.partition_point(|&c| c > coord)
    };
    if upper == 0 {
        return Some(0.0);
    }
    let i0 = upper - 1;
    let (c0, c1) = (coord_values[i0], coord_values[upper.min(n - 1)]);
    if c1 == c0 {
        return Some(i0 as f64);
    }
    Some(i0 as f64 + (coord - c0) / (c1 - c0))
}

/// Clamp an index to valid bounds
pub fn clamp_index(index: f64, size: usize) -> f64 {
    index.max(0.0).min(size.saturating_sub(1) as f64)
}

/// Get the weight for linear interpolation
pub fn linear_weight(fraction: f64) -> (f64, f64) {
    (1.0 - fraction, fraction)
}

/// `n` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_to_index() {
        let lons = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(coord_to_index(0.0, &lons), Some(0.0));
        assert_eq!(coord_to_index(15.0, &lons), Some(1.5));
        assert_eq!(coord_to_index(30.0, &lons), Some(3.0));
        assert_eq!(coord_to_index(31.0, &lons), None);

        let lats = [90.0, 45.0, 0.0];
        assert_eq!(coord_to_index(67.5, &lats), Some(0.5));
        assert_eq!(coord_to_index(0.0, &lats), Some(2.0));
        assert_eq!(coord_to_index(-1.0, &lats), None);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-1.0, 10), 0.0);
        assert_eq!(clamp_index(5.5, 10), 5.5);
        assert_eq!(clamp_index(15.0, 10), 9.0);
    }

    #[test]
    fn test_linear_weight() {
        let (w0, w1) = linear_weight(0.3);
        assert!((w0 - 0.7).abs() < 1e-10);
        assert!((w1 - 0.3).abs() < 1e-10);
        assert!((w0 + w1 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }
}
