//! Colormap splitting around a center value.
//!
//! A range lying entirely on one side of the center is drawn with the
//! matching half of the base ramp, stretched back to full length. A range
//! straddling the center keeps the whole ramp and gets a two-slope norm
//! instead.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{GplotError, Result};

use super::colormap::{Colormap, RAMP_SAMPLES};
use super::norm::TwoSlopeNorm;
use super::ramp::SampledRamp;

/// How a colormap is adapted to a range relative to its center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Never split: the base ramp spans the range linearly
    None,
    /// Two-slope norm only when the range straddles the center
    #[default]
    Auto,
    /// Also remap one-sided ranges onto the matching half
    Force,
}

impl SplitMode {
    /// Legacy integer codes `0`, `1`, `2`
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(SplitMode::None),
            1 => Ok(SplitMode::Auto),
            2 => Ok(SplitMode::Force),
            other => Err(GplotError::config(format!(
                "Invalid split mode {} (expected 0, 1 or 2)",
                other
            ))),
        }
    }
}

impl FromStr for SplitMode {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "0" => Ok(SplitMode::None),
            "auto" | "1" => Ok(SplitMode::Auto),
            "force" | "2" => Ok(SplitMode::Force),
            _ => Err(GplotError::config(format!(
                "Invalid split mode: {} (expected none, auto or force)",
                s
            ))),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SplitMode::None => "none",
            SplitMode::Auto => "auto",
            SplitMode::Force => "force",
        };
        f.write_str(s)
    }
}

fn straddles(vmin: f64, vmax: f64, vcenter: f64) -> bool {
    (vmin - vcenter) * (vmax - vcenter) < 0.0
}

/// `n` points from `start` to `stop`, optionally without `stop`.
fn linspace(start: f64, stop: f64, n: usize, endpoint: bool) -> Vec<f64> {
    let div = if endpoint { n.saturating_sub(1) } else { n }.max(1) as f64;
    (0..n)
        .map(|i| start + (stop - start) * i as f64 / div)
        .collect()
}

/// Sample the half of `cmap` on the same side of `vcenter` as the range
/// and stretch it to a full 256-sample ramp. Alpha is preserved.
///
/// The center color itself is excluded when the range stays strictly
/// away from `vcenter`. A straddling range is a precondition error.
pub fn remap_colormap(
    cmap: &dyn Colormap,
    vmin: f64,
    vmax: f64,
    vcenter: f64,
) -> Result<SampledRamp> {
    let (positions, side) = if vmax <= vcenter && vmin < vcenter {
        (linspace(0.0, 0.5, RAMP_SAMPLES, !(vmax < vcenter)), "lower")
    } else if vmin >= vcenter {
        let positions = if vmin > vcenter {
            let mut p = linspace(1.0, 0.5, RAMP_SAMPLES, false);
            p.reverse();
            p
        } else {
            linspace(0.5, 1.0, RAMP_SAMPLES, true)
        };
        (positions, "upper")
    } else {
        return Err(GplotError::precondition(format!(
            "Cannot remap range [{}, {}] straddling center {}",
            vmin, vmax, vcenter
        )));
    };

    trace!(colormap = cmap.name(), side = side, "Remapping colormap half");
    let colors = positions.iter().map(|&t| cmap.map_normalized(t)).collect();
    Ok(SampledRamp::new(format!("{}_{}", cmap.name(), side), colors))
}

/// Adapt a base colormap to `[vmin, vmax]` according to `split`.
///
/// Returns the colormap to draw with and, when the range straddles the
/// center under `Auto` or `Force`, the two-slope norm to use with it.
pub fn adjust_colormap(
    cmap: Arc<dyn Colormap>,
    vmin: f64,
    vmax: f64,
    vcenter: f64,
    split: SplitMode,
) -> Result<(Arc<dyn Colormap>, Option<TwoSlopeNorm>)> {
    match split {
        SplitMode::None => Ok((cmap, None)),
        SplitMode::Auto => {
            if straddles(vmin, vmax, vcenter) {
                Ok((cmap, Some(TwoSlopeNorm::new(vmin, vcenter, vmax)?)))
            } else {
                Ok((cmap, None))
            }
        }
        SplitMode::Force => {
            if straddles(vmin, vmax, vcenter) {
                Ok((cmap, Some(TwoSlopeNorm::new(vmin, vcenter, vmax)?)))
            } else if (vmin < vcenter && vmax <= vcenter) || (vmin >= vcenter && vmax > vcenter) {
                let remapped = remap_colormap(cmap.as_ref(), vmin, vmax, vcenter)?;
                Ok((Arc::new(remapped), None))
            } else {
                Ok((cmap, None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::get_colormap;

    #[test]
    fn test_none_returns_base_ramp() {
        let base = get_colormap("rdbu_r").unwrap();
        for &(lo, hi) in &[(-5.0, 5.0), (1.0, 3.0), (-3.0, -1.0)] {
            let (cmap, norm) = adjust_colormap(base.clone(), lo, hi, 0.0, SplitMode::None).unwrap();
            assert!(Arc::ptr_eq(&cmap, &base));
            assert!(norm.is_none());
        }
    }

    #[test]
    fn test_auto_straddling_gets_two_slope() {
        let base = get_colormap("rdbu_r").unwrap();
        let (cmap, norm) = adjust_colormap(base.clone(), -2.0, 8.0, 0.0, SplitMode::Auto).unwrap();
        assert!(Arc::ptr_eq(&cmap, &base));
        let norm = norm.unwrap();
        assert_eq!(norm.normalize(0.0), 0.5);

        let (_, norm) = adjust_colormap(base, 1.0, 8.0, 0.0, SplitMode::Auto).unwrap();
        assert!(norm.is_none());
    }

    #[test]
    fn test_force_remaps_one_sided_ranges() {
        let base = get_colormap("coolwarm").unwrap();

        let (upper, norm) = adjust_colormap(base.clone(), 1.0, 8.0, 0.0, SplitMode::Force).unwrap();
        assert!(norm.is_none());
        assert_eq!(upper.name(), "coolwarm_upper");
        assert_eq!(upper.map_normalized(1.0), base.map_normalized(1.0));

        let (lower, _) = adjust_colormap(base.clone(), -8.0, -1.0, 0.0, SplitMode::Force).unwrap();
        assert_eq!(lower.name(), "coolwarm_lower");
        assert_eq!(lower.map_normalized(0.0), base.map_normalized(0.0));

        let (_, norm) = adjust_colormap(base, -1.0, 3.0, 0.0, SplitMode::Force).unwrap();
        assert!(norm.is_some());
    }

    #[test]
    fn test_remap_touching_center_includes_it() {
        let base = get_colormap("coolwarm").unwrap();
        let lower = remap_colormap(base.as_ref(), -4.0, 0.0, 0.0).unwrap();
        assert_eq!(lower.map_normalized(1.0), base.map_normalized(0.5));
        let upper = remap_colormap(base.as_ref(), 0.0, 4.0, 0.0).unwrap();
        assert_eq!(upper.map_normalized(0.0), base.map_normalized(0.5));
        assert_eq!(upper.colors().len(), RAMP_SAMPLES);
    }

    #[test]
    fn test_remap_rejects_straddling() {
        let base = get_colormap("coolwarm").unwrap();
        assert!(matches!(
            remap_colormap(base.as_ref(), -1.0, 1.0, 0.0),
            Err(GplotError::Precondition { .. })
        ));
    }

    #[test]
    fn test_split_codes() {
        assert_eq!(SplitMode::from_code(2).unwrap(), SplitMode::Force);
        assert!(SplitMode::from_code(3).is_err());
        assert_eq!("none".parse::<SplitMode>().unwrap(), SplitMode::None);
    }
}
