//! Drawable artists.
//!
//! Artists carry everything the raster renderer and layout code need:
//! coordinates already projected by the backend, the colormap and norm
//! resolved by the plot method, and styling.

use std::sync::Arc;

use image::RgbaImage;
use ndarray::Array2;

use crate::colormaps::{Colormap, Extend, Norm};
use crate::layout::colorbar::{Orientation, TickLayout};
use crate::tables::TickSpacing;

use super::barbs::BarbIncrements;

/// Coordinate system of a text or line artist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coords {
    Data,
    /// Fractions of the owning axes
    Axes,
    /// Fractions of the figure
    Figure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone)]
pub struct FilledContour {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Array2<f64>,
    pub levels: Vec<f64>,
    pub cmap: Arc<dyn Colormap>,
    pub norm: Norm,
    pub extend: Extend,
    pub alpha: f64,
}

impl FilledContour {
    /// Fill color for a value: bands take the color of their midpoint,
    /// values outside the levels are filled only when extended.
    pub fn color_at(&self, value: f64) -> Option<[u8; 4]> {
        let (first, last) = match (self.levels.first(), self.levels.last()) {
            (Some(f), Some(l)) if !value.is_nan() => (*f, *l),
            _ => return None,
        };
        if value < first {
            return self
                .extend
                .has_min()
                .then(|| self.cmap.lookup(self.norm.normalize(value)));
        }
        if value > last {
            return self
                .extend
                .has_max()
                .then(|| self.cmap.lookup(self.norm.normalize(value)));
        }
        let band = self
            .levels
            .windows(2)
            .position(|w| value <= w[1])
            .unwrap_or(0);
        let mid = match self.levels.get(band..band + 2) {
            Some([a, b]) => 0.5 * (a + b),
            _ => first,
        };
        Some(self.cmap.lookup(self.norm.normalize(mid)))
    }
}

#[derive(Debug, Clone)]
pub struct ContourLines {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Array2<f64>,
    pub levels: Vec<f64>,
    /// One color per level
    pub colors: Vec<[u8; 4]>,
    pub linewidths: Vec<f64>,
    pub dashed: Vec<bool>,
    pub alpha: f64,
}

/// Raster image with nearest-neighbour sampling and lower origin
#[derive(Debug, Clone)]
pub struct ImageArtist {
    pub z: Array2<f64>,
    /// `[xmin, xmax, ymin, ymax]`
    pub extent: [f64; 4],
    pub cmap: Arc<dyn Colormap>,
    pub norm: Norm,
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct MeshArtist {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Array2<f64>,
    pub cmap: Arc<dyn Colormap>,
    pub norm: Norm,
    pub alpha: f64,
}

/// Transparent filled contour marking regions with a hatch pattern
#[derive(Debug, Clone)]
pub struct HatchArtist {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Array2<f64>,
    pub levels: Vec<f64>,
    pub pattern: char,
    pub color: [u8; 4],
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct QuiverArtist {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    /// Data units per arrow length in axes width; auto when `None`
    pub scale: Option<f64>,
    /// Shaft width as a fraction of the axes width
    pub width: f64,
    pub color: [u8; 4],
    pub alpha: f64,
}

impl QuiverArtist {
    /// Explicit scale, or one that draws the mean arrow about a
    /// twentieth of the axes width long
    pub fn resolved_scale(&self) -> f64 {
        if let Some(scale) = self.scale.filter(|s| *s > 0.0) {
            return scale;
        }
        let (sum, n) = self
            .u
            .iter()
            .zip(self.v.iter())
            .map(|(u, v)| u.hypot(*v))
            .filter(|m| m.is_finite())
            .fold((0.0, 0usize), |(s, n), m| (s + m, n + 1));
        if n == 0 || sum == 0.0 {
            return 1.0;
        }
        let mean = sum / n as f64;
        1.8 * mean * (n as f64).sqrt().max(10.0)
    }
}

#[derive(Debug, Clone)]
pub struct QuiverKeyArtist {
    /// Anchor in axes fraction
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub label: String,
    pub fontsize: f64,
}

#[derive(Debug, Clone)]
pub struct BarbsArtist {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    /// Barb length in points
    pub length: f64,
    pub increments: BarbIncrements,
    pub color: [u8; 4],
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct Polylines {
    pub lines: Vec<Vec<(f64, f64)>>,
    pub color: [u8; 4],
    pub linewidth: f64,
}

/// Map imagery underlay
#[derive(Debug, Clone)]
pub struct Imagery {
    pub service: String,
    pub xpixels: u32,
    pub dpi: u32,
    pub extent: [f64; 4],
    pub image: Option<Arc<RgbaImage>>,
}

#[derive(Debug, Clone)]
pub struct ColorbarArtist {
    pub orientation: Orientation,
    pub cmap: Arc<dyn Colormap>,
    pub norm: Norm,
    pub extend: Extend,
    /// Discrete band boundaries for contour methods
    pub boundaries: Option<Vec<f64>>,
    pub drawedges: bool,
    pub ticks: TickLayout,
    /// `Uniform` gives every band between `boundaries` the same width
    pub spacing: TickSpacing,
}

impl ColorbarArtist {
    /// Value range covered by the colorbar body
    pub fn value_range(&self) -> (f64, f64) {
        match self.boundaries.as_deref() {
            Some([first, .., last]) => (*first, *last),
            _ => (self.norm.vmin(), self.norm.vmax()),
        }
    }

    fn uniform_bounds(&self) -> Option<&[f64]> {
        match (self.spacing, self.boundaries.as_deref()) {
            (TickSpacing::Uniform, Some(bounds)) if bounds.len() >= 2 => Some(bounds),
            _ => None,
        }
    }

    /// Fraction along the colorbar body of a data value
    pub fn position(&self, value: f64) -> f64 {
        if let Some(bounds) = self.uniform_bounds() {
            let nbands = bounds.len() - 1;
            let band = bounds
                .windows(2)
                .position(|w| value <= w[1])
                .unwrap_or(nbands - 1);
            let (lo, hi) = (bounds[band], bounds[band + 1]);
            let within = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
            return (band as f64 + within.clamp(0.0, 1.0)) / nbands as f64;
        }
        let (vmin, vmax) = self.value_range();
        if vmax > vmin {
            (value - vmin) / (vmax - vmin)
        } else {
            0.5
        }
    }

    /// Data value at a fraction along the colorbar body
    pub fn value_at(&self, t: f64) -> f64 {
        if let Some(bounds) = self.uniform_bounds() {
            let nbands = bounds.len() - 1;
            let scaled = t.clamp(0.0, 1.0) * nbands as f64;
            let band = (scaled.floor() as usize).min(nbands - 1);
            let (lo, hi) = (bounds[band], bounds[band + 1]);
            return lo + (scaled - band as f64) * (hi - lo);
        }
        let (vmin, vmax) = self.value_range();
        vmin + t * (vmax - vmin)
    }
}

#[derive(Debug, Clone)]
pub struct TextArtist {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub coords: Coords,
    pub fontsize: f64,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl TextArtist {
    /// Left/bottom aligned text in axes fraction
    pub fn axes(text: impl Into<String>, x: f64, y: f64, fontsize: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            coords: Coords::Axes,
            fontsize,
            halign: HAlign::Left,
            valign: VAlign::Bottom,
        }
    }

    pub fn aligned(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LineArtist {
    pub points: Vec<(f64, f64)>,
    pub coords: Coords,
    pub color: [u8; 4],
    pub linewidth: f64,
}

#[derive(Debug, Clone)]
pub enum Artist {
    FilledContour(FilledContour),
    ContourLines(ContourLines),
    Image(ImageArtist),
    Mesh(MeshArtist),
    Hatch(HatchArtist),
    Quiver(QuiverArtist),
    QuiverKey(QuiverKeyArtist),
    Barbs(BarbsArtist),
    Coastlines(Polylines),
    GridLines(Polylines),
    Imagery(Imagery),
    Colorbar(ColorbarArtist),
    Text(TextArtist),
    Line(LineArtist),
}

impl Artist {
    pub fn kind(&self) -> &'static str {
        match self {
            Artist::FilledContour(_) => "contourf",
            Artist::ContourLines(_) => "contour",
            Artist::Image(_) => "imshow",
            Artist::Mesh(_) => "pcolormesh",
            Artist::Hatch(_) => "hatch",
            Artist::Quiver(_) => "quiver",
            Artist::QuiverKey(_) => "quiverkey",
            Artist::Barbs(_) => "barbs",
            Artist::Coastlines(_) => "coastlines",
            Artist::GridLines(_) => "gridlines",
            Artist::Imagery(_) => "imagery",
            Artist::Colorbar(_) => "colorbar",
            Artist::Text(_) => "text",
            Artist::Line(_) => "line",
        }
    }

    /// Colormap and norm of a scalar-mapped artist
    pub fn mappable(&self) -> Option<(&Arc<dyn Colormap>, &Norm)> {
        match self {
            Artist::FilledContour(a) => Some((&a.cmap, &a.norm)),
            Artist::Image(a) => Some((&a.cmap, &a.norm)),
            Artist::Mesh(a) => Some((&a.cmap, &a.norm)),
            _ => None,
        }
    }
}
