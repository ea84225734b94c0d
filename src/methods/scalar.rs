//! Scalar plot methods: contour fills and lines, box fills, hatching and
//! shading.
//!
//! Each descriptor resolves its value range, levels, colormap and norm on
//! construction, so every configuration error surfaces before drawing.

use std::sync::Arc;

use image::RgbaImage;
use ndarray::ArrayViewD;
use tracing::debug;

use crate::colormaps::{
    adjust_colormap, get_colormap, parse_color, Colormap, Extend, LinearNorm, ListedColormap,
    Norm, SplitMode, DEFAULT_COLORMAP,
};
use crate::error::{GplotError, Result};
use crate::levels::{generate_levels, ZeroPolicy};
use crate::range::{compute_range, validate_quantiles};
use crate::tables::LevelColorMap;

/// Inputs shared by the range-driven methods
#[derive(Debug, Clone)]
pub struct ScaleOptions {
    /// Desired number of levels; the generated count may differ slightly
    pub num: usize,
    pub zero: ZeroPolicy,
    /// Method default when `None`: auto for contours, force for box fills
    pub split: Option<SplitMode>,
    /// Explicit levels, bypassing level generation
    pub levels: Option<Vec<f64>>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub ql: Option<f64>,
    pub qr: Option<f64>,
    pub vcenter: f64,
    pub cmap: Option<Arc<dyn Colormap>>,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            num: 15,
            zero: ZeroPolicy::MayBeLevel,
            split: None,
            levels: None,
            vmin: None,
            vmax: None,
            ql: None,
            qr: None,
            vcenter: 0.0,
            cmap: None,
        }
    }
}

impl ScaleOptions {
    fn base_cmap(&self) -> Result<Arc<dyn Colormap>> {
        match &self.cmap {
            Some(cmap) => Ok(cmap.clone()),
            None => get_colormap(DEFAULT_COLORMAP),
        }
    }
}

/// Resolved scale of a scalar method
#[derive(Debug, Clone)]
pub struct ScaleInfo {
    /// Contour levels; empty for box and mesh fills
    pub levels: Vec<f64>,
    /// Display range
    pub vmin: f64,
    pub vmax: f64,
    /// True data range
    pub data_min: f64,
    pub data_max: f64,
    pub ext_below: bool,
    pub ext_above: bool,
    pub extend: Extend,
    pub cmap: Arc<dyn Colormap>,
    pub norm: Norm,
}

impl ScaleInfo {
    /// Levels-driven scale used by isofill and isoline
    fn contour(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        validate_quantiles(opts.ql, opts.qr)?;
        let range = compute_range(vars, opts.vmin, opts.vmax, opts.ql, opts.qr)?;

        let levels = match &opts.levels {
            Some(levels) => checked_levels(levels)?,
            None => generate_levels(range.display_min, range.display_max, opts.num, opts.zero)?,
        };
        let lo = levels.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let split = opts.split.unwrap_or(SplitMode::Auto);
        let (cmap, two_slope) = adjust_colormap(opts.base_cmap()?, lo, hi, opts.vcenter, split)?;
        let norm = two_slope.map_or_else(|| LinearNorm::new(lo, hi).into(), Norm::from);

        let ext_below = range.true_min < lo;
        let ext_above = range.true_max > hi;
        debug!(
            nlevels = levels.len(),
            lo = lo,
            hi = hi,
            split = %split,
            cmap = cmap.name(),
            "Resolved contour scale"
        );
        Ok(Self {
            levels,
            vmin: range.display_min,
            vmax: range.display_max,
            data_min: range.true_min,
            data_max: range.true_max,
            ext_below,
            ext_above,
            extend: Extend::from_flags(ext_below, ext_above),
            cmap,
            norm,
        })
    }

    /// Range-driven scale used by boxfill and pcolor
    fn continuous(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        validate_quantiles(opts.ql, opts.qr)?;
        let range = compute_range(vars, opts.vmin, opts.vmax, opts.ql, opts.qr)?;
        let (vmin, vmax) = (range.display_min, range.display_max);

        let split = opts.split.unwrap_or(SplitMode::Force);
        let (cmap, two_slope) = adjust_colormap(opts.base_cmap()?, vmin, vmax, opts.vcenter, split)?;
        let norm = two_slope.map_or_else(|| LinearNorm::new(vmin, vmax).into(), Norm::from);

        Ok(Self {
            levels: Vec::new(),
            vmin,
            vmax,
            data_min: range.true_min,
            data_max: range.true_max,
            ext_below: range.exceeds_below(),
            ext_above: range.exceeds_above(),
            extend: Extend::from_flags(range.exceeds_below(), range.exceeds_above()),
            cmap,
            norm,
        })
    }

    /// Scale taken verbatim from a level table
    fn from_table(table: &LevelColorMap) -> Self {
        let edges = table.bin_edges();
        let lo = edges.first().copied().unwrap_or(f64::NAN);
        let hi = edges.last().copied().unwrap_or(f64::NAN);
        let extend = table.extend();
        Self {
            levels: edges.to_vec(),
            vmin: lo,
            vmax: hi,
            data_min: lo,
            data_max: hi,
            ext_below: extend.has_min(),
            ext_above: extend.has_max(),
            extend,
            cmap: table.cmap(),
            norm: table.norm().clone(),
        }
    }

    /// Color used for a value under this scale
    pub fn color_of(&self, value: f64) -> [u8; 4] {
        self.cmap.lookup(self.norm.normalize(value))
    }
}

fn checked_levels(levels: &[f64]) -> Result<Vec<f64>> {
    if levels.is_empty() {
        return Err(GplotError::config("Explicit levels must not be empty"));
    }
    if levels.iter().any(|l| !l.is_finite()) {
        return Err(GplotError::config("Explicit levels must be finite"));
    }
    if levels.windows(2).any(|w| w[1] <= w[0]) {
        return Err(GplotError::config("Explicit levels must be strictly increasing"));
    }
    Ok(levels.to_vec())
}

/// Thin contour lines drawn over a filled contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: [u8; 4],
    pub linewidth: f64,
    pub dashed: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            // 0.3 grey
            color: [77, 77, 77, 255],
            linewidth: 0.2,
            dashed: false,
        }
    }
}

/// Filled contours
#[derive(Debug, Clone)]
pub struct Isofill {
    pub scale: ScaleInfo,
    pub stroke: Option<Stroke>,
    /// Table the scale came from; its ticks label the colorbar
    pub table: Option<Arc<LevelColorMap>>,
}

impl Isofill {
    pub fn new(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        Ok(Self {
            scale: ScaleInfo::contour(vars, opts)?,
            stroke: None,
            table: None,
        })
    }

    /// Fill with the bins, colors and extend of a level table
    pub fn from_table(table: Arc<LevelColorMap>) -> Self {
        Self {
            scale: ScaleInfo::from_table(&table),
            stroke: None,
            table: Some(table),
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Contour lines
#[derive(Debug, Clone)]
pub struct Isoline {
    pub scale: ScaleInfo,
    /// Single color for every line; overrides `black` and the colormap
    pub color: Option<[u8; 4]>,
    pub black: bool,
    pub linewidth: f64,
    pub alpha: f64,
    pub dash_negative: bool,
    /// Levels drawn at twice the line width
    pub bold_lines: Vec<f64>,
}

/// Line width multiplier for bold levels
pub const BOLD_FACTOR: f64 = 2.0;

impl Isoline {
    pub fn new(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        Ok(Self {
            scale: ScaleInfo::contour(vars, opts)?,
            color: None,
            black: false,
            linewidth: 1.0,
            alpha: 1.0,
            dash_negative: true,
            bold_lines: Vec::new(),
        })
    }

    /// Per-level color: explicit color, then black, then the colormap
    pub fn line_colors(&self) -> Vec<[u8; 4]> {
        let fixed = self.color.or(self.black.then_some([0, 0, 0, 255]));
        self.scale
            .levels
            .iter()
            .map(|&level| fixed.unwrap_or_else(|| self.scale.color_of(level)))
            .collect()
    }

    pub fn line_widths(&self) -> Vec<f64> {
        self.scale
            .levels
            .iter()
            .map(|level| {
                if self.bold_lines.contains(level) {
                    self.linewidth * BOLD_FACTOR
                } else {
                    self.linewidth
                }
            })
            .collect()
    }

    pub fn dashes(&self) -> Vec<bool> {
        self.scale
            .levels
            .iter()
            .map(|&level| self.dash_negative && level < 0.0)
            .collect()
    }
}

/// Nearest-neighbour image over the data extent
#[derive(Debug, Clone)]
pub struct Boxfill {
    pub scale: ScaleInfo,
}

impl Boxfill {
    pub fn new(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        Ok(Self {
            scale: ScaleInfo::continuous(vars, opts)?,
        })
    }
}

/// Quadrilateral mesh
#[derive(Debug, Clone)]
pub struct Pcolor {
    pub scale: ScaleInfo,
}

impl Pcolor {
    pub fn new(vars: &[ArrayViewD<'_, f64>], opts: &ScaleOptions) -> Result<Self> {
        Ok(Self {
            scale: ScaleInfo::continuous(vars, opts)?,
        })
    }
}

/// Hatching over the non-zero cells of a mask
#[derive(Debug, Clone, PartialEq)]
pub struct Hatch {
    /// One of `. / \ - | + x o O *`
    pub pattern: char,
    pub color: [u8; 4],
    pub alpha: f64,
}

impl Default for Hatch {
    fn default() -> Self {
        Self {
            pattern: '.',
            color: [0, 0, 0, 255],
            alpha: 0.7,
        }
    }
}

impl Hatch {
    pub fn new(pattern: char) -> Result<Self> {
        if !".\\/-|+xXoO*".contains(pattern) {
            return Err(GplotError::invalid(
                "hatch",
                format!("Unknown hatch pattern: {}", pattern),
            ));
        }
        Ok(Self {
            pattern,
            ..Self::default()
        })
    }
}

/// Translucent single-color fill over cells equal to 1
#[derive(Debug, Clone)]
pub struct Shading {
    pub color: [u8; 4],
    pub alpha: f64,
    pub cmap: Arc<ListedColormap>,
}

impl Shading {
    pub fn new(color: &str, alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(GplotError::invalid(
                "alpha",
                format!("Shading alpha must lie in [0, 1], got {}", alpha),
            ));
        }
        let rgba = parse_color(color)?;
        Ok(Self {
            color: rgba,
            alpha,
            cmap: Arc::new(ListedColormap::single("shading", [rgba[0], rgba[1], rgba[2], 255])),
        })
    }
}

impl Default for Shading {
    fn default() -> Self {
        let grey = [128, 128, 128, 255];
        Self {
            color: grey,
            alpha: 0.5,
            cmap: Arc::new(ListedColormap::single("shading", grey)),
        }
    }
}

/// Map imagery underlay
#[derive(Debug, Clone)]
pub struct Gis {
    pub service: String,
    pub xpixels: u32,
    pub dpi: u32,
    /// Pre-fetched imagery; without it the underlay is left empty
    pub image: Option<Arc<RgbaImage>>,
}

impl Default for Gis {
    fn default() -> Self {
        Self {
            service: "ESRI_Imagery_World_2D".to_string(),
            xpixels: 2000,
            dpi: 96,
            image: None,
        }
    }
}
