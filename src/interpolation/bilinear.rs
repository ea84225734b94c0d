//! Bilinear interpolation.
//!
//! This method performs linear interpolation in two dimensions using
//! the four nearest grid points. A missing corner makes the result missing.

use ndarray::ArrayView2;

use super::common::{clamp_index, linear_weight};
use super::{check_dims, Interpolator};
use crate::error::Result;

/// Bilinear interpolator
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn interpolate(&self, data: ArrayView2<'_, f64>, row: f64, col: f64) -> Result<f64> {
        let (nrows, ncols) = check_dims(data)?;
        let row = clamp_index(row, nrows);
        let col = clamp_index(col, ncols);

        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(nrows - 1);
        let c1 = (c0 + 1).min(ncols - 1);
        let (wr0, wr1) = linear_weight(row - r0 as f64);
        let (wc0, wc1) = linear_weight(col - c0 as f64);

        let top = data[[r0, c0]] * wc0 + data[[r0, c1]] * wc1;
        let bottom = data[[r1, c0]] * wc0 + data[[r1, c1]] * wc1;
        Ok(top * wr0 + bottom * wr1)
    }

    fn name(&self) -> &str {
        "bilinear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bilinear_interpolation() {
        let data = array![[0.0, 10.0], [20.0, 30.0]];
        let interp = BilinearInterpolator;
        assert_eq!(interp.interpolate(data.view(), 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(interp.interpolate(data.view(), 0.5, 0.5).unwrap(), 15.0);
        assert_eq!(interp.interpolate(data.view(), 1.0, 0.25).unwrap(), 22.5);
        // clamps outside the grid
        assert_eq!(interp.interpolate(data.view(), 3.0, 3.0).unwrap(), 30.0);
    }

    #[test]
    fn test_missing_corner_propagates() {
        let data = array![[0.0, f64::NAN], [20.0, 30.0]];
        let interp = BilinearInterpolator;
        assert!(interp.interpolate(data.view(), 0.5, 0.5).unwrap().is_nan());
        assert_eq!(interp.interpolate(data.view(), 1.0, 0.0).unwrap(), 20.0);
    }
}
