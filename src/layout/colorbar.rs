//! Colorbar placement and tick staggering.
//!
//! A colorbar is either attached beside its owning axes, which shrinks the
//! axes to free a slot, or shared by the whole figure and created once by
//! the first panel. Horizontal colorbars of contour methods spread their
//! ticks over two rows so neighboring labels do not collide.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::figure::{Axes, Figure, Rect};
use crate::colormaps::Extend;
use crate::error::{GplotError, Result};

use super::geometry::SubplotGeometry;

/// Pad used when the decoration extent cannot be measured
pub const FALLBACK_PAD: f64 = 0.15;

pub const CBAR_SHRINK: f64 = 0.85;
pub const CBAR_FRACTION: f64 = 0.07;
pub const CBAR_ASPECT: f64 = 35.0;

/// Vertical span of the top-row tick marks and height of their labels,
/// in colorbar axes fraction
pub const TOP_TICK_SPAN: (f64, f64) = (1.0, 1.35);
pub const TOP_LABEL_Y: f64 = 1.25;

const SHARED_HEIGHT: f64 = 0.02;
const SHARED_BOTTOM: f64 = 0.18;
const SHARED_RIGHT: f64 = 0.90;
const SHARED_HORIZONTAL: [f64; 3] = [0.15, 0.65, SHARED_HEIGHT];
const SHARED_VERTICAL: [f64; 4] = [0.92, 0.20, SHARED_HEIGHT, 0.60];
const CONTOUR_PAD_FACTOR: f64 = 1.25;
const SHARED_PAD_FACTOR: f64 = 2.6;

// tick length plus label pad, in points
const TICK_DECORATION_PT: f64 = 7.0;

/// Where colorbars go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendScope {
    None,
    /// One colorbar per panel
    Local,
    /// One colorbar for the figure, created by the first panel
    #[default]
    Global,
}

impl FromStr for LegendScope {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LegendScope::None),
            "local" => Ok(LegendScope::Local),
            "global" => Ok(LegendScope::Global),
            _ => Err(GplotError::config(format!(
                "Invalid legend: {} (expected none, local or global)",
                s
            ))),
        }
    }
}

impl fmt::Display for LegendScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LegendScope::None => "none",
            LegendScope::Local => "local",
            LegendScope::Global => "global",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl FromStr for Orientation {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            _ => Err(GplotError::config(format!(
                "Invalid legend orientation: {} (expected horizontal or vertical)",
                s
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        })
    }
}

/// Partial update of the figure's subplot margins
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubplotAdjust {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub top: Option<f64>,
}

/// Space taken by the axes' tick labels on the colorbar side, in axes
/// fraction. `None` when the axes has no measurable size.
pub fn decoration_extent(
    figure: &Figure,
    axes: &Axes,
    orientation: Orientation,
    fontsize: f64,
) -> Option<f64> {
    let tick_px = TICK_DECORATION_PT * figure.dpi / 72.0;
    match orientation {
        Orientation::Horizontal => {
            let height_px = axes.rect.height * figure.height_px as f64;
            if !(height_px > 0.0) {
                return None;
            }
            if !axes.xticks.sides.bottom || axes.xticks.labels.is_empty() {
                return Some(0.0);
            }
            let (_, h) = figure.text_extent("0", fontsize);
            Some((h + tick_px) / height_px)
        }
        Orientation::Vertical => {
            let width_px = axes.rect.width * figure.width_px as f64;
            if !(width_px > 0.0) {
                return None;
            }
            if !axes.yticks.sides.right || axes.yticks.labels.is_empty() {
                return Some(0.0);
            }
            let widest = axes
                .yticks
                .labels
                .iter()
                .map(|l| figure.text_extent(l, fontsize).0)
                .fold(0.0, f64::max);
            Some((widest + tick_px) / width_px)
        }
    }
}

/// Pad between an axes and its attached colorbar: the measured decoration
/// extent plus `base_pad`, or [`FALLBACK_PAD`] when nothing finite was
/// measured.
pub fn colorbar_pad(extent: Option<f64>, base_pad: f64) -> f64 {
    match extent {
        Some(e) if (e + base_pad).is_finite() => e + base_pad,
        _ => FALLBACK_PAD,
    }
}

/// Parent and colorbar rectangles after attaching a colorbar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachedColorbar {
    pub parent: Rect,
    pub colorbar: Rect,
}

/// Split `parent` into a shrunk parent and a colorbar slot of
/// [`CBAR_FRACTION`] separated by `pad` (both in parent fraction). The
/// colorbar spans [`CBAR_SHRINK`] of the parent's length and is at most
/// `1 / CBAR_ASPECT` as thick as it is long.
pub fn attach_colorbar(
    parent: Rect,
    orientation: Orientation,
    pad: f64,
    figure_px: (u32, u32),
) -> AttachedColorbar {
    let (fig_w, fig_h) = (figure_px.0 as f64, figure_px.1 as f64);
    match orientation {
        Orientation::Vertical => {
            let w = parent.width;
            let slot_w = w * CBAR_FRACTION;
            let shrunk = Rect::new(
                parent.x0,
                parent.y0,
                (w * (1.0 - CBAR_FRACTION - pad)).max(0.0),
                parent.height,
            );
            let cb_h = parent.height * CBAR_SHRINK;
            let cb_w = (slot_w * fig_w).min(cb_h * fig_h / CBAR_ASPECT) / fig_w;
            let colorbar = Rect::new(
                parent.x0 + w * (1.0 - CBAR_FRACTION),
                parent.y0 + (parent.height - cb_h) / 2.0,
                cb_w,
                cb_h,
            );
            AttachedColorbar {
                parent: shrunk,
                colorbar,
            }
        }
        Orientation::Horizontal => {
            let h = parent.height;
            let slot_h = h * CBAR_FRACTION;
            let shrunk = Rect::new(
                parent.x0,
                parent.y0 + h * (CBAR_FRACTION + pad),
                parent.width,
                (h * (1.0 - CBAR_FRACTION - pad)).max(0.0),
            );
            let cb_w = parent.width * CBAR_SHRINK;
            let cb_h = (slot_h * fig_h).min(cb_w * fig_w / CBAR_ASPECT) / fig_h;
            let colorbar = Rect::new(
                parent.x0 + (parent.width - cb_w) / 2.0,
                parent.y0 + slot_h - cb_h,
                cb_w,
                cb_h,
            );
            AttachedColorbar {
                parent: shrunk,
                colorbar,
            }
        }
    }
}

/// Inputs for [`place_colorbar`], measured from the figure by the caller
#[derive(Debug, Clone)]
pub struct ColorbarRequest {
    pub scope: LegendScope,
    pub orientation: Orientation,
    pub geometry: SubplotGeometry,
    /// Isofill and isoline get discrete, staggered ticks
    pub contour_method: bool,
    pub constrained_layout: bool,
    /// Owning axes rectangle
    pub parent: Rect,
    /// See [`decoration_extent`]
    pub decoration: Option<f64>,
    /// Height of a dummy `0.0` label in axes fraction
    pub label_height_axes: f64,
    /// Height of a dummy `0.0` label in figure fraction
    pub label_height_figure: f64,
    pub figure_px: (u32, u32),
    /// Union of all subplot rectangles
    pub subplot_union: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorbarPlacement {
    /// Beside the owning axes, which must be moved to `parent`
    Attached(AttachedColorbar),
    /// One colorbar for the figure
    Shared {
        colorbar: Rect,
        /// Margin change under manual layout
        adjust: Option<SubplotAdjust>,
        /// Rectangle the subplots are fitted into under constrained layout
        fit_axes: Option<Rect>,
    },
}

/// Decide where the colorbar of a panel goes; `None` means no colorbar.
pub fn place_colorbar(req: &ColorbarRequest) -> Option<ColorbarPlacement> {
    match req.scope {
        LegendScope::None => None,
        LegendScope::Local => Some(attached(req)),
        LegendScope::Global if req.geometry.is_single() => Some(attached(req)),
        LegendScope::Global if req.geometry.index == 1 => Some(shared(req)),
        LegendScope::Global => None,
    }
}

fn attached(req: &ColorbarRequest) -> ColorbarPlacement {
    let base_pad = if req.contour_method && req.orientation == Orientation::Horizontal {
        req.label_height_axes * CONTOUR_PAD_FACTOR
    } else {
        0.0
    };
    let pad = colorbar_pad(req.decoration, base_pad);
    ColorbarPlacement::Attached(attach_colorbar(
        req.parent,
        req.orientation,
        pad,
        req.figure_px,
    ))
}

fn shared(req: &ColorbarRequest) -> ColorbarPlacement {
    let pad = req.label_height_figure * SHARED_PAD_FACTOR;

    if req.constrained_layout {
        if let Some(union) = req.subplot_union {
            return shared_constrained(union, req.orientation, pad);
        }
    }

    match req.orientation {
        Orientation::Horizontal => {
            let [x0, width, height] = SHARED_HORIZONTAL;
            ColorbarPlacement::Shared {
                colorbar: Rect::new(x0, SHARED_BOTTOM - height - pad, width, height),
                adjust: Some(SubplotAdjust {
                    bottom: Some(SHARED_BOTTOM),
                    ..SubplotAdjust::default()
                }),
                fit_axes: None,
            }
        }
        Orientation::Vertical => {
            let [x0, y0, width, height] = SHARED_VERTICAL;
            ColorbarPlacement::Shared {
                colorbar: Rect::new(x0, y0, width, height),
                adjust: Some(SubplotAdjust {
                    right: Some(SHARED_RIGHT),
                    ..SubplotAdjust::default()
                }),
                fit_axes: None,
            }
        }
    }
}

/// Colorbar along the union of all axes, which are compressed to make room
fn shared_constrained(union: Rect, orientation: Orientation, pad: f64) -> ColorbarPlacement {
    let (colorbar, fit) = match orientation {
        Orientation::Horizontal => {
            let width = union.width * CBAR_SHRINK;
            (
                Rect::new(
                    union.x0 + (union.width - width) / 2.0,
                    union.y0,
                    width,
                    SHARED_HEIGHT,
                ),
                Rect::new(
                    union.x0,
                    union.y0 + SHARED_HEIGHT + pad,
                    union.width,
                    (union.height - SHARED_HEIGHT - pad).max(0.0),
                ),
            )
        }
        Orientation::Vertical => {
            let height = union.height * CBAR_SHRINK;
            (
                Rect::new(
                    union.x1() - SHARED_HEIGHT,
                    union.y0 + (union.height - height) / 2.0,
                    SHARED_HEIGHT,
                    height,
                ),
                Rect::new(
                    union.x0,
                    union.y0,
                    (union.width - SHARED_HEIGHT - pad).max(0.0),
                    union.height,
                ),
            )
        }
    };
    ColorbarPlacement::Shared {
        colorbar,
        adjust: None,
        fit_axes: Some(fit),
    }
}

/// A tick on the top row of a staggered colorbar
#[derive(Debug, Clone, PartialEq)]
pub struct TopTick {
    /// Position in colorbar axes fraction
    pub x: f64,
    pub value: f64,
    pub label: String,
}

/// Colorbar ticks split between the normal row and the top row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickLayout {
    pub bottom: Vec<f64>,
    pub bottom_labels: Vec<String>,
    pub top: Vec<TopTick>,
}

impl TickLayout {
    /// Every tick on the normal row
    pub fn plain(ticks: &[f64], labels: &[String]) -> Self {
        Self {
            bottom: ticks.to_vec(),
            bottom_labels: labels.to_vec(),
            top: Vec::new(),
        }
    }
}

/// Offset and scale of the colorbar body in axes fraction; each active
/// extend arrow takes 5% of the length.
pub fn extend_shift_scale(extend: Extend) -> (f64, f64) {
    match extend {
        Extend::Min => (0.05, 0.95),
        Extend::Max => (0.0, 0.95),
        Extend::Both => (0.05, 0.90),
        Extend::Neither => (0.0, 1.0),
    }
}

/// Stagger ticks of a horizontal colorbar over two rows.
///
/// Odd-indexed ticks stay on the normal row; even-indexed ticks go to the
/// top row at their axes-fraction position. Vertical colorbars keep every
/// tick on the normal row.
pub fn stagger_ticks(
    ticks: &[f64],
    labels: &[String],
    vmin: f64,
    vmax: f64,
    orientation: Orientation,
    extend: Extend,
) -> TickLayout {
    if orientation == Orientation::Vertical {
        return TickLayout::plain(ticks, labels);
    }

    let (shift, scale) = extend_shift_scale(extend);
    let span = vmax - vmin;
    let label_of = |i: usize| labels.get(i).cloned().unwrap_or_default();

    let mut layout = TickLayout::default();
    for (i, &t) in ticks.iter().enumerate() {
        if i % 2 == 1 {
            layout.bottom.push(t);
            layout.bottom_labels.push(label_of(i));
        } else {
            let frac = if span != 0.0 { (t - vmin) / span } else { 0.0 };
            layout.top.push(TopTick {
                x: shift + scale * frac,
                value: t,
                label: label_of(i),
            });
        }
    }
    layout
}
