//! Colormap trait and utilities.
//!
//! A colormap maps a normalized value in `[0, 1]` to RGBA. Values that a
//! norm pushes below 0 or above 1 pick the under/over colors when the map
//! defines them, and the end colors otherwise.

use std::fmt;
use std::sync::Arc;

use crate::error::{GplotError, Result};

use super::ramp::SampledRamp;

/// Fully transparent pixel, used for missing values.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Number of samples taken from continuous presets.
pub const RAMP_SAMPLES: usize = 256;

/// Ramp used when a plot method is not given one
pub const DEFAULT_COLORMAP: &str = "rdbu_r";

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync + fmt::Debug {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;

    /// Color for normalized values below 0, if distinct from the first color
    fn under_color(&self) -> Option<[u8; 4]> {
        None
    }

    /// Color for normalized values above 1, if distinct from the last color
    fn over_color(&self) -> Option<[u8; 4]> {
        None
    }

    /// Map an unclamped normalized value, honoring under/over colors.
    fn lookup(&self, t: f64) -> [u8; 4] {
        if t.is_nan() {
            TRANSPARENT
        } else if t < 0.0 {
            self.under_color().unwrap_or_else(|| self.map_normalized(0.0))
        } else if t > 1.0 {
            self.over_color().unwrap_or_else(|| self.map_normalized(1.0))
        } else {
            self.map_normalized(t)
        }
    }

    /// Evenly spaced samples over `[0, 1]`
    fn sample(&self, n: usize) -> Vec<[u8; 4]> {
        match n {
            0 => Vec::new(),
            1 => vec![self.map_normalized(0.0)],
            _ => (0..n)
                .map(|i| self.map_normalized(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

/// Coolwarm anchor colors (blue to grey to red).
const COOLWARM: [[u8; 3]; 32] = [
    [59, 76, 192],
    [68, 90, 204],
    [77, 104, 215],
    [87, 117, 225],
    [98, 130, 234],
    [108, 142, 241],
    [119, 154, 247],
    [130, 165, 251],
    [141, 176, 254],
    [152, 185, 255],
    [163, 194, 255],
    [174, 201, 253],
    [184, 208, 249],
    [194, 213, 244],
    [204, 217, 238],
    [213, 219, 230],
    [221, 221, 221],
    [229, 216, 209],
    [236, 211, 197],
    [241, 204, 185],
    [245, 196, 173],
    [247, 187, 160],
    [247, 177, 148],
    [247, 166, 135],
    [244, 154, 123],
    [241, 141, 111],
    [236, 127, 99],
    [229, 112, 88],
    [222, 96, 77],
    [213, 80, 66],
    [203, 62, 56],
    [192, 40, 47],
];

/// Names accepted by [`get_colormap`] (each also with an `_r` suffix).
pub const PRESET_NAMES: [&str; 13] = [
    "rdbu", "rdylbu", "spectral", "coolwarm", "viridis", "plasma", "inferno", "magma", "cividis",
    "turbo", "blues", "reds", "greys",
];

fn preset(base: &str) -> Option<SampledRamp> {
    let gradient = match base {
        "rdbu" => colorgrad::rd_bu(),
        "rdylbu" => colorgrad::rd_yl_bu(),
        "spectral" => colorgrad::spectral(),
        "viridis" => colorgrad::viridis(),
        "plasma" => colorgrad::plasma(),
        "inferno" => colorgrad::inferno(),
        "magma" => colorgrad::magma(),
        "cividis" => colorgrad::cividis(),
        "turbo" => colorgrad::turbo(),
        "blues" => colorgrad::blues(),
        "reds" => colorgrad::reds(),
        "greys" => colorgrad::greys(),
        "coolwarm" => return Some(SampledRamp::from_rgb("coolwarm", &COOLWARM)),
        _ => return None,
    };
    Some(SampledRamp::from_gradient(base, &gradient, RAMP_SAMPLES))
}

/// Get a colormap by name; a trailing `_r` reverses it.
pub fn get_colormap(name: &str) -> Result<Arc<dyn Colormap>> {
    let lower = name.to_lowercase();
    let (base, reversed) = match lower.strip_suffix("_r") {
        Some(base) => (base, true),
        None => (lower.as_str(), false),
    };
    let ramp = preset(base).ok_or_else(|| GplotError::InvalidParameter {
        param: "colormap".to_string(),
        message: format!("Unknown colormap: {}", name),
    })?;
    if reversed {
        Ok(Arc::new(ramp.reversed()))
    } else {
        Ok(Arc::new(ramp))
    }
}

/// Linear interpolation between two RGBA colors
pub fn lerp_color(c1: [u8; 4], c2: [u8; 4], t: f64) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let v = c1[i] as f64 * (1.0 - t) + c2[i] as f64 * t;
        *channel = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Parse a color specification.
///
/// Accepts a grey level string (`"0.8"`), single-letter codes
/// (`k w r g b y c m`), a handful of names, `#rrggbb` and `#rrggbbaa`.
pub fn parse_color(spec: &str) -> Result<[u8; 4]> {
    let s = spec.trim().to_lowercase();
    if let Ok(grey) = s.parse::<f64>() {
        if (0.0..=1.0).contains(&grey) {
            let v = (grey * 255.0).round() as u8;
            return Ok([v, v, v, 255]);
        }
    }
    let named = match s.as_str() {
        "k" | "black" => Some([0, 0, 0, 255]),
        "w" | "white" => Some([255, 255, 255, 255]),
        "r" | "red" => Some([255, 0, 0, 255]),
        "g" | "green" => Some([0, 128, 0, 255]),
        "b" | "blue" => Some([0, 0, 255, 255]),
        "y" | "yellow" => Some([191, 191, 0, 255]),
        "c" | "cyan" => Some([0, 191, 191, 255]),
        "m" | "magenta" => Some([191, 0, 191, 255]),
        "grey" | "gray" => Some([128, 128, 128, 255]),
        "none" | "transparent" => Some(TRANSPARENT),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }
    if let Some(hex) = s.strip_prefix('#') {
        if (hex.len() == 6 || hex.len() == 8) && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            let parsed = (|| -> std::result::Result<[u8; 4], std::num::ParseIntError> {
                let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
                Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
            })();
            if let Ok(color) = parsed {
                return Ok(color);
            }
        }
    }
    Err(GplotError::invalid(
        "color",
        format!("Unrecognized color specification: {}", spec),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_color() {
        let black = [0, 0, 0, 255];
        let white = [255, 255, 255, 255];

        let mid = lerp_color(black, white, 0.5);
        assert_eq!(mid, [128, 128, 128, 255]);
    }

    #[test]
    fn test_get_colormap_names() {
        for name in PRESET_NAMES {
            let cmap = get_colormap(name).unwrap();
            assert_eq!(cmap.name(), name);
            assert!(get_colormap(&format!("{}_r", name)).is_ok());
        }
        assert!(matches!(
            get_colormap("nope"),
            Err(GplotError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_reversed_colormap() {
        let rdbu = get_colormap("RdBu").unwrap();
        let rdbu_r = get_colormap("rdbu_r").unwrap();
        assert_eq!(rdbu.map_normalized(0.0), rdbu_r.map_normalized(1.0));
        assert_eq!(rdbu.map_normalized(1.0), rdbu_r.map_normalized(0.0));
        // rdbu starts red
        let start = rdbu.map_normalized(0.0);
        assert!(start[0] > start[2]);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let cmap = get_colormap("coolwarm").unwrap();
        assert_eq!(cmap.lookup(-0.5), cmap.map_normalized(0.0));
        assert_eq!(cmap.lookup(1.5), [192, 40, 47, 255]);
        assert_eq!(cmap.lookup(f64::NAN), TRANSPARENT);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0.8").unwrap(), [204, 204, 204, 255]);
        assert_eq!(parse_color("k").unwrap(), [0, 0, 0, 255]);
        assert_eq!(parse_color("#ff8000").unwrap(), [255, 128, 0, 255]);
        assert_eq!(parse_color("#ff800080").unwrap(), [255, 128, 0, 128]);
        assert!(parse_color("1.5").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }
}
