//! Resampling of 2D fields onto a new rectilinear grid.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GplotError, Result};

use super::common::{coord_to_index, linspace};
use super::{get_interpolator, Interpolator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegridMethod {
    #[default]
    Linear,
    Nearest,
}

impl FromStr for RegridMethod {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(RegridMethod::Linear),
            "nearest" => Ok(RegridMethod::Nearest),
            _ => Err(GplotError::config(format!(
                "Invalid regrid method: {} (expected linear or nearest)",
                s
            ))),
        }
    }
}

impl fmt::Display for RegridMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegridMethod::Linear => "linear",
            RegridMethod::Nearest => "nearest",
        })
    }
}

/// A field resampled onto new coordinates
#[derive(Debug, Clone)]
pub struct Regridded {
    pub data: Array2<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Axis spanning the same range as `coords` at spacing `reso`, keeping the
/// end points: `floor(|last - first| / reso) + 1` points.
pub fn axis_at_resolution(coords: &[f64], reso: f64, axis: &str) -> Result<Vec<f64>> {
    if !(reso > 0.0) {
        return Err(GplotError::config(format!(
            "Regrid resolution must be positive, got {}",
            reso
        )));
    }
    let (first, last) = match coords {
        [first, .., last] => (*first, *last),
        _ => {
            return Err(GplotError::shape(format!(
                "{} axis needs at least 2 points to regrid",
                axis
            )))
        }
    };
    let n = ((last - first).abs() / reso).floor() as usize + 1;
    if n <= 1 {
        return Err(GplotError::precondition(format!(
            "{} resolution {} is too low for range [{}, {}]",
            axis, reso, first, last
        )));
    }
    Ok(linspace(first, last, n))
}

/// Resample `data` (rows along `y`, columns along `x`) onto `new_x`/`new_y`.
/// Target points outside the source grid are missing.
pub fn regrid(
    data: ArrayView2<'_, f64>,
    x: &[f64],
    y: &[f64],
    new_x: &[f64],
    new_y: &[f64],
    method: RegridMethod,
) -> Result<Array2<f64>> {
    let (nrows, ncols) = data.dim();
    if x.len() != ncols || y.len() != nrows {
        return Err(GplotError::shape(format!(
            "Coordinates ({}, {}) do not match data shape {}x{}",
            y.len(),
            x.len(),
            nrows,
            ncols
        )));
    }
    let interpolator: Box<dyn Interpolator> = get_interpolator(&method.to_string())?;

    let cols: Vec<Option<f64>> = new_x.iter().map(|&c| coord_to_index(c, x)).collect();
    let rows: Vec<Option<f64>> = new_y.iter().map(|&r| coord_to_index(r, y)).collect();

    let mut out = Array2::from_elem((new_y.len(), new_x.len()), f64::NAN);
    for (i, row) in rows.iter().enumerate() {
        let Some(row) = row else { continue };
        for (j, col) in cols.iter().enumerate() {
            if let Some(col) = col {
                out[[i, j]] = interpolator.interpolate(data, *row, *col)?;
            }
        }
    }
    Ok(out)
}

/// Regrid to a uniform resolution `reso` along both axes.
pub fn regrid_to_reso(
    data: ArrayView2<'_, f64>,
    x: &[f64],
    y: &[f64],
    reso: f64,
    method: RegridMethod,
) -> Result<Regridded> {
    let new_x = axis_at_resolution(x, reso, "x")?;
    let new_y = axis_at_resolution(y, reso, "y")?;
    debug!(
        reso = reso,
        nx = new_x.len(),
        ny = new_y.len(),
        method = %method,
        "Regridding field"
    );
    let data = regrid(data, x, y, &new_x, &new_y, method)?;
    Ok(Regridded {
        data,
        x: new_x,
        y: new_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ramp() -> (Array2<f64>, Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..6).map(|i| i as f64 * 2.0).collect();
        let data = Array2::from_shape_fn((6, 11), |(i, j)| y[i] * 100.0 + x[j]);
        (data, x, y)
    }

    #[test]
    fn test_linear_regrid_preserves_planes() {
        let (data, x, y) = ramp();
        let out = regrid_to_reso(data.view(), &x, &y, 2.5, RegridMethod::Linear).unwrap();
        assert_eq!(out.x, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(out.y, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert!((out.data[[1, 1]] - (250.0 + 2.5)).abs() < 1e-9);
        assert!((out.data[[4, 4]] - 1010.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_regrid() {
        let (data, x, y) = ramp();
        let out = regrid(data.view(), &x, &y, &[2.4], &[3.1], RegridMethod::Nearest).unwrap();
        assert_eq!(out[[0, 0]], 402.0);
    }

    #[test]
    fn test_degenerate_resolution() {
        let (data, x, y) = ramp();
        assert!(matches!(
            regrid_to_reso(data.view(), &x, &y, 50.0, RegridMethod::Linear),
            Err(GplotError::Precondition { .. })
        ));
        assert!(matches!(
            regrid_to_reso(data.view(), &x, &y, 0.0, RegridMethod::Linear),
            Err(GplotError::Config { .. })
        ));
        assert!(regrid(data.view(), &x[..5], &y, &x, &y, RegridMethod::Linear).is_err());
    }

    #[test]
    fn test_outside_points_are_missing() {
        let (data, x, y) = ramp();
        let out = regrid(data.view(), &x, &y, &[-1.0, 1.0], &[0.0], RegridMethod::Linear).unwrap();
        assert!(out[[0, 0]].is_nan());
        assert_eq!(out[[0, 1]], 1.0);
    }
}
