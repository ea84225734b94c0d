//! Figure and axes scene model.
//!
//! A figure owns a list of axes placed in figure-fraction coordinates
//! (origin bottom-left). Each axes owns the artists drawn into it. Subplot
//! axes follow the figure's subplot parameters and move when they change;
//! axes added with an explicit rectangle are pinned.

use serde::{Deserialize, Serialize};

use crate::error::{GplotError, Result};
use crate::layout::colorbar::SubplotAdjust;
use crate::layout::geometry::{SideFlags, SubplotGeometry};

use super::artist::Artist;

/// Rectangle in figure-fraction coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, width: f64, height: f64) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    pub fn x1(&self) -> f64 {
        self.x0 + self.width
    }

    pub fn y1(&self) -> f64 {
        self.y0 + self.height
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x0.min(other.x0);
        let y0 = self.y0.min(other.y0);
        Rect::new(x0, y0, self.x1().max(other.x1()) - x0, self.y1().max(other.y1()) - y0)
    }

    /// Pixel bounds `(left, top, right, bottom)` with the y axis flipped
    pub fn to_pixels(&self, width_px: u32, height_px: u32) -> (i64, i64, i64, i64) {
        let w = width_px as f64;
        let h = height_px as f64;
        (
            (self.x0 * w).round() as i64,
            ((1.0 - self.y1()) * h).round() as i64,
            (self.x1() * w).round() as i64,
            ((1.0 - self.y0) * h).round() as i64,
        )
    }

    /// Map a rectangle given relative to `from` so that it is relative to `to`
    fn remap(&self, from: &Rect, to: &Rect) -> Rect {
        let sx = to.width / from.width;
        let sy = to.height / from.height;
        Rect::new(
            to.x0 + (self.x0 - from.x0) * sx,
            to.y0 + (self.y0 - from.y0) * sy,
            self.width * sx,
            self.height * sy,
        )
    }
}

/// Figure-level subplot margins and spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

impl SubplotParams {
    /// Grid cell of a subplot; rows count from the top
    pub fn cell(&self, geometry: &SubplotGeometry) -> Rect {
        let nrows = geometry.nrows as f64;
        let ncols = geometry.ncols as f64;
        let cell_h = (self.top - self.bottom) / (nrows + self.hspace * (nrows - 1.0));
        let cell_w = (self.right - self.left) / (ncols + self.wspace * (ncols - 1.0));
        let (row, col) = geometry.position();
        let top = self.top - row as f64 * cell_h * (1.0 + self.hspace);
        let left = self.left + col as f64 * cell_w * (1.0 + self.wspace);
        Rect::new(left, top - cell_h, cell_w, cell_h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxesId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId(pub usize);

/// Tick positions and labels on one axis, with the sides that show labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSet {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub sides: SideFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub fontsize: f64,
}

#[derive(Debug)]
pub struct Axes {
    pub rect: Rect,
    pub geometry: Option<SubplotGeometry>,
    pub pinned: bool,
    pub facecolor: [u8; 4],
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub title: Option<Title>,
    pub xticks: TickSet,
    pub yticks: TickSet,
    pub visible_frame: bool,
    artists: Vec<(ArtistId, Artist)>,
    next_artist: usize,
}

impl Axes {
    fn new(rect: Rect, geometry: Option<SubplotGeometry>) -> Self {
        Self {
            rect,
            geometry,
            pinned: geometry.is_none(),
            facecolor: [255, 255, 255, 255],
            xlim: None,
            ylim: None,
            title: None,
            xticks: TickSet::default(),
            yticks: TickSet::default(),
            visible_frame: true,
            artists: Vec::new(),
            next_artist: 0,
        }
    }

    pub fn add_artist(&mut self, artist: Artist) -> ArtistId {
        let id = ArtistId(self.next_artist);
        self.next_artist += 1;
        self.artists.push((id, artist));
        id
    }

    /// Remove an artist; returns it if it was present
    pub fn remove_artist(&mut self, id: ArtistId) -> Option<Artist> {
        let pos = self.artists.iter().position(|(a, _)| *a == id)?;
        Some(self.artists.remove(pos).1)
    }

    pub fn artist(&self, id: ArtistId) -> Option<&Artist> {
        self.artists.iter().find(|(a, _)| *a == id).map(|(_, artist)| artist)
    }

    /// Artists in drawing order
    pub fn artists(&self) -> impl Iterator<Item = &Artist> {
        self.artists.iter().map(|(_, a)| a)
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn clear_artists(&mut self) {
        self.artists.clear();
    }

    pub fn clear_ticks(&mut self) {
        self.xticks = TickSet::default();
        self.yticks = TickSet::default();
    }

    /// Shrink the rectangle about its center so one data unit spans the
    /// same number of pixels along x and y
    pub fn apply_equal_aspect(&mut self, width_px: u32, height_px: u32) {
        let (Some((x0, x1)), Some((y0, y1))) = (self.xlim, self.ylim) else {
            return;
        };
        let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());
        let w = self.rect.width * width_px as f64;
        let h = self.rect.height * height_px as f64;
        if !(dx > 0.0 && dy > 0.0 && w > 0.0 && h > 0.0) {
            return;
        }
        let data_ratio = dy / dx;
        if h / w > data_ratio {
            let height = w * data_ratio / height_px as f64;
            self.rect.y0 += 0.5 * (self.rect.height - height);
            self.rect.height = height;
        } else {
            let width = h / data_ratio / width_px as f64;
            self.rect.x0 += 0.5 * (self.rect.width - width);
            self.rect.width = width;
        }
    }

    /// Map a data coordinate to a figure-fraction point
    pub fn data_to_figure(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (x0, x1) = self.xlim?;
        let (y0, y1) = self.ylim?;
        if x1 == x0 || y1 == y0 {
            return None;
        }
        Some((
            self.rect.x0 + (x - x0) / (x1 - x0) * self.rect.width,
            self.rect.y0 + (y - y0) / (y1 - y0) * self.rect.height,
        ))
    }
}

/// A figure: pixel size, resolution and its axes
#[derive(Debug)]
pub struct Figure {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: f64,
    pub constrained_layout: bool,
    pub facecolor: [u8; 4],
    params: SubplotParams,
    axes: Vec<Axes>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(1200, 900, 100.0)
    }
}

impl Figure {
    pub fn new(width_px: u32, height_px: u32, dpi: f64) -> Self {
        Self {
            width_px,
            height_px,
            dpi,
            constrained_layout: false,
            facecolor: [255, 255, 255, 255],
            params: SubplotParams::default(),
            axes: Vec::new(),
        }
    }

    pub fn with_constrained_layout(mut self, enabled: bool) -> Self {
        self.constrained_layout = enabled;
        self
    }

    pub fn params(&self) -> &SubplotParams {
        &self.params
    }

    /// Add a subplot at `index` of an `nrows x ncols` grid
    pub fn add_subplot(&mut self, nrows: usize, ncols: usize, index: usize) -> Result<AxesId> {
        let geometry = SubplotGeometry::new(nrows, ncols, index)?;
        let rect = self.params.cell(&geometry);
        self.axes.push(Axes::new(rect, Some(geometry)));
        Ok(AxesId(self.axes.len() - 1))
    }

    /// Add axes at a fixed rectangle
    pub fn add_axes(&mut self, rect: Rect) -> AxesId {
        self.axes.push(Axes::new(rect, None));
        AxesId(self.axes.len() - 1)
    }

    /// Update subplot margins and re-place every unpinned subplot
    pub fn subplots_adjust(&mut self, adjust: SubplotAdjust) {
        if let Some(v) = adjust.left {
            self.params.left = v;
        }
        if let Some(v) = adjust.right {
            self.params.right = v;
        }
        if let Some(v) = adjust.bottom {
            self.params.bottom = v;
        }
        if let Some(v) = adjust.top {
            self.params.top = v;
        }
        let params = self.params;
        for axes in self.axes.iter_mut().filter(|a| !a.pinned) {
            if let Some(geometry) = axes.geometry {
                axes.rect = params.cell(&geometry);
            }
        }
    }

    /// Approximate rendered size in pixels of a single line of text
    pub fn text_extent(&self, text: &str, fontsize: f64) -> (f64, f64) {
        let pt = fontsize * self.dpi / 72.0;
        (text.chars().count() as f64 * 0.6 * pt, 1.2 * pt)
    }

    pub fn axes(&self, id: AxesId) -> Result<&Axes> {
        self.axes.get(id.0).ok_or_else(|| unknown_axes(id))
    }

    pub fn axes_mut(&mut self, id: AxesId) -> Result<&mut Axes> {
        self.axes.get_mut(id.0).ok_or_else(|| unknown_axes(id))
    }

    pub fn all_axes(&self) -> impl Iterator<Item = &Axes> {
        self.axes.iter()
    }

    /// Union of the rectangles of all subplot axes
    pub fn subplot_union(&self) -> Option<Rect> {
        self.axes
            .iter()
            .filter(|a| a.geometry.is_some())
            .map(|a| a.rect)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Scale and move every subplot so their union fills `target`
    pub fn fit_axes_into(&mut self, target: Rect) {
        let Some(from) = self.subplot_union() else {
            return;
        };
        if from.width <= 0.0 || from.height <= 0.0 {
            return;
        }
        for axes in self.axes.iter_mut().filter(|a| a.geometry.is_some()) {
            axes.rect = axes.rect.remap(&from, &target);
            axes.pinned = true;
        }
    }
}

fn unknown_axes(id: AxesId) -> GplotError {
    GplotError::invalid("axes", format!("No axes with id {}", id.0))
}
