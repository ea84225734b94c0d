//! "Nice" level-scale generation.
//!
//! Given a data range and a target number of intervals, pick a step from a
//! small set of round multiples of a power of ten and lay out levels that
//! cover the range with one step of margin on each side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GplotError, Result};

/// Round step multiples (scaled into `(10, 100]`).
pub const NICE_STEPS: [f64; 9] = [20.0, 25.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

/// Whether zero must, may or must not fall on a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroPolicy {
    MustNotBeLevel,
    #[default]
    MayBeLevel,
    MustBeLevel,
}

impl ZeroPolicy {
    /// Legacy integer codes: `-1` must not, `0`/`1` may, `2` must.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            -1 => Ok(ZeroPolicy::MustNotBeLevel),
            0 | 1 => Ok(ZeroPolicy::MayBeLevel),
            2 => Ok(ZeroPolicy::MustBeLevel),
            other => Err(GplotError::invalid(
                "zero",
                format!("Unknown zero policy code: {} (expected -1, 0, 1 or 2)", other),
            )),
        }
    }
}

impl FromStr for ZeroPolicy {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "must-not" | "must_not" | "-1" => Ok(ZeroPolicy::MustNotBeLevel),
            "may" | "0" | "1" => Ok(ZeroPolicy::MayBeLevel),
            "must" | "2" => Ok(ZeroPolicy::MustBeLevel),
            _ => Err(GplotError::invalid(
                "zero",
                format!("Unknown zero policy: {} (expected must-not, may or must)", s),
            )),
        }
    }
}

impl fmt::Display for ZeroPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ZeroPolicy::MustNotBeLevel => "must-not",
            ZeroPolicy::MayBeLevel => "may",
            ZeroPolicy::MustBeLevel => "must",
        };
        f.write_str(s)
    }
}

/// Snap a step scaled into `(10, 100]` up to the next nice multiple.
fn snap_step(step: f64) -> f64 {
    NICE_STEPS
        .iter()
        .copied()
        .find(|&nice| step <= nice)
        .unwrap_or(100.0)
}

/// Multiply by `10^il`, dividing instead when `il` is negative so that
/// round values stay exactly representable.
fn scale_by(value: f64, il: i32) -> f64 {
    if il >= 0 {
        value * 10f64.powi(il)
    } else {
        value / 10f64.powi(-il)
    }
}

/// Generate "nice" level boundaries covering `[lo, hi]`.
///
/// The result has roughly `count` entries; round numbers win over an exact
/// count. `lo == hi` yields `[lo]`.
///
/// # Arguments
///
/// * `lo`, `hi` - Range ends, in either order
/// * `count` - Target number of intervals, must be positive
/// * `zero` - Zero inclusion policy
pub fn generate_levels(lo: f64, hi: f64, count: usize, zero: ZeroPolicy) -> Result<Vec<f64>> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(GplotError::config(format!(
            "Level range must be finite, got [{}, {}]",
            lo, hi
        )));
    }
    if lo == hi {
        return Ok(vec![lo]);
    }
    if count == 0 {
        return Err(GplotError::config("Level count must be positive"));
    }

    let (mut min, mut max) = if lo < hi { (lo, hi) } else { (hi, lo) };
    if zero == ZeroPolicy::MustBeLevel {
        min = min.min(0.0);
        max = max.max(0.0);
    }

    let delta = (max - min) / count as f64;
    let il = (-delta.log10() + 2.0).floor() as i32;
    let delta = snap_step(scale_by(delta, il));
    let min = scale_by(min, il);
    let max = scale_by(max, il);

    let offset = if zero == ZeroPolicy::MustNotBeLevel {
        1.5
    } else {
        1.0
    };
    let first = (min / delta).floor() - offset;

    // Small counts can end short of max; extend until it is covered
    let mut candidates: Vec<f64> = (0..2 * count)
        .map(|k| delta * (k as f64 + first))
        .collect();
    while candidates.last().map_or(true, |&c| c < max) {
        candidates.push(delta * (candidates.len() as f64 + first));
    }

    let a = candidates
        .iter()
        .position(|&c| c > min)
        .map(|j| j.saturating_sub(1))
        .unwrap_or(0);
    let b = candidates
        .iter()
        .position(|&c| c >= max)
        .map_or(candidates.len(), |j| (j + 1).min(candidates.len()));
    debug_assert!(candidates[b - 1] >= max);

    Ok(candidates[a..b.max(a)]
        .iter()
        .map(|&c| scale_by(c, -il))
        .collect())
}

/// Round a representative vector magnitude to a nice key length.
///
/// Takes the 80th percentile of the finite magnitudes, scales it into
/// `[10, 100)`, rounds to a multiple of ten and scales back. Returns `None`
/// when no positive finite magnitude exists.
pub fn nice_key_length<I>(magnitudes: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut finite: Vec<f64> = magnitudes.into_iter().filter(|m| m.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.total_cmp(b));
    let k = crate::range::quantile_sorted(&finite, 0.8);
    if k <= 0.0 {
        return None;
    }
    let il = (-k.log10() + 2.0).floor() as i32;
    let scaled = scale_by(k, il);
    let rounded = (scaled / 10.0).round() * 10.0;
    Some(scale_by(rounded, -il))
}
