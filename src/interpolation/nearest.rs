//! Nearest neighbor interpolation.
//!
//! This method selects the value of the nearest grid point.
//! It's the simplest interpolation method, offering the fastest
//! performance but with less smooth results compared to higher-order methods.

use ndarray::ArrayView2;

use super::common::clamp_index;
use super::{check_dims, Interpolator};
use crate::error::Result;

/// Nearest neighbor interpolator
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn interpolate(&self, data: ArrayView2<'_, f64>, row: f64, col: f64) -> Result<f64> {
        let (nrows, ncols) = check_dims(data)?;
        let r = clamp_index(row.round(), nrows) as usize;
        let c = clamp_index(col.round(), ncols) as usize;
        Ok(data[[r, c]])
    }

    fn name(&self) -> &str {
        "nearest"
    }
}
