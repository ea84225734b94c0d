//! Interpolation of gridded 2D fields.
//!
//! Interpolators sample a field at fractional `(row, col)` indices. The
//! [`regrid`] module builds on them to resample a field onto a new
//! rectilinear grid and is compiled only with the `regrid` feature.

pub mod bilinear;
pub mod common;
pub mod nearest;
#[cfg(feature = "regrid")]
pub mod regrid;

use ndarray::ArrayView2;

use crate::error::{GplotError, Result};

/// Trait for interpolation methods
pub trait Interpolator {
    /// Interpolate a value at the given fractional `(row, col)` indices
    fn interpolate(&self, data: ArrayView2<'_, f64>, row: f64, col: f64) -> Result<f64>;

    /// Get the name of this interpolation method
    fn name(&self) -> &str;
}

/// Get an interpolator by name
pub fn get_interpolator(name: &str) -> Result<Box<dyn Interpolator>> {
    match name.to_lowercase().as_str() {
        "nearest" => Ok(Box::new(nearest::NearestInterpolator)),
        "linear" | "bilinear" => Ok(Box::new(bilinear::BilinearInterpolator)),
        _ => Err(GplotError::invalid(
            "interpolation",
            format!("Unknown interpolation method: {}", name),
        )),
    }
}

fn check_dims(data: ArrayView2<'_, f64>) -> Result<(usize, usize)> {
    let (nrows, ncols) = data.dim();
    if nrows == 0 || ncols == 0 {
        return Err(GplotError::Interpolation {
            message: format!("Cannot interpolate an empty {}x{} grid", nrows, ncols),
        });
    }
    Ok((nrows, ncols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_interpolator() {
        assert_eq!(get_interpolator("Nearest").unwrap().name(), "nearest");
        assert_eq!(get_interpolator("linear").unwrap().name(), "bilinear");
        assert!(get_interpolator("bicubic").is_err());
    }
}
