//! The 2D plot orchestrator.
//!
//! [`Plot2D`] owns one data slab and one [`PlotMethod`] and drives an axes
//! of a [`Figure`] through the stages
//! `Init → SlabExtracted → GridBuilt → BackendPrepared → Drawn →
//! AxesLabeled → ColorbarPlaced → Titled`. Every configuration error is
//! raised by the constructors; drawing only fails on figure errors.

use std::fmt;

use ndarray::{Array2, ArrayViewD, Axis, Ix2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::backend::{AxisDecoration, Grid, PlotBackend};
use crate::canvas::artist::{
    Artist, BarbsArtist, ColorbarArtist, ContourLines, FilledContour, HAlign, HatchArtist,
    ImageArtist, Imagery, MeshArtist, QuiverArtist, QuiverKeyArtist, TextArtist, VAlign,
};
use crate::canvas::figure::{ArtistId, AxesId, Figure, Rect, Title};
use crate::colormaps::{parse_color, LinearNorm};
use crate::config::PlotConfig;
use crate::error::{GplotError, Result};
use crate::layout::colorbar::{
    decoration_extent, place_colorbar, stagger_ticks, ColorbarPlacement, ColorbarRequest,
    LegendScope, Orientation, TickLayout,
};
use crate::layout::geometry::{effective_fontsize, panel_title, AxisLabels, LabelAxes, SubplotGeometry};
use crate::layout::ticks::{format_ticks, ticks_within, MaxNLocator};
use crate::logging::log_timed_operation;
use crate::methods::{PlotMethod, VectorField, VectorSampling};
use crate::range::pool_finite;
use crate::tables::TickSpacing;

/// Decoration options of one plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// `"none"` suppresses the title; multi-panel titles get a panel letter
    pub title: Option<String>,
    pub label_axes: LabelAxes,
    pub axes_grid: bool,
    pub legend: LegendScope,
    pub legend_orientation: Orientation,
    /// No labels, colorbar, title or basemap
    pub clean: bool,
    pub fontsize: f64,
    /// Axes background, visible where data is missing
    pub fill_color: [u8; 4],
    pub units: String,
    /// Equal pixel size of one data unit along x and y
    pub fix_aspect: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: None,
            label_axes: LabelAxes::Auto,
            axes_grid: false,
            legend: LegendScope::Global,
            legend_orientation: Orientation::Horizontal,
            clean: false,
            fontsize: 12.0,
            fill_color: [204, 204, 204, 255],
            units: String::new(),
            fix_aspect: false,
        }
    }
}

impl PlotOptions {
    /// Options carrying the decoration defaults of a configuration
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        Ok(Self {
            title: None,
            label_axes: config.label_axes,
            axes_grid: config.axes_grid,
            legend: config.legend,
            legend_orientation: config.legend_orientation,
            clean: config.clean,
            fontsize: config.fontsize,
            fill_color: parse_color(&config.fill_color)?,
            units: String::new(),
            fix_aspect: config.fix_aspect,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.fontsize > 0.0) {
            return Err(GplotError::config(format!(
                "Font size must be positive, got {}",
                self.fontsize
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    SlabExtracted,
    GridBuilt,
    BackendPrepared,
    Drawn,
    AxesLabeled,
    ColorbarPlaced,
    Titled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::SlabExtracted => "slab-extracted",
            Stage::GridBuilt => "grid-built",
            Stage::BackendPrepared => "backend-prepared",
            Stage::Drawn => "drawn",
            Stage::AxesLabeled => "axes-labeled",
            Stage::ColorbarPlaced => "colorbar-placed",
            Stage::Titled => "titled",
        };
        f.write_str(s)
    }
}

/// Take the trailing 2D slab of an array; leading axes are indexed at 0.
pub fn get_slab(array: ArrayViewD<'_, f64>) -> Result<Array2<f64>> {
    if array.ndim() < 2 {
        return Err(GplotError::shape(format!(
            "Slab needs at least 2 dimensions, got {}",
            array.ndim()
        )));
    }
    let mut view = array;
    while view.ndim() > 2 {
        view = view.index_axis_move(Axis(0), 0);
    }
    Ok(view.into_dimensionality::<Ix2>()?.to_owned())
}

fn index_coords(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn check_coords(shape: (usize, usize), x: &[f64], y: &[f64]) -> Result<()> {
    let (ny, nx) = shape;
    if x.len() != nx {
        return Err(GplotError::shape(format!(
            "x has {} values but the slab has {} columns",
            x.len(),
            nx
        )));
    }
    if y.len() != ny {
        return Err(GplotError::shape(format!(
            "y has {} values but the slab has {} rows",
            y.len(),
            ny
        )));
    }
    Ok(())
}

/// Orchestrates one method over one axes
#[derive(Debug)]
pub struct Plot2D<B: PlotBackend> {
    backend: B,
    method: PlotMethod,
    /// Caller coordinates, before backend preparation
    x: Vec<f64>,
    y: Vec<f64>,
    /// Prepared grid: one field for scalar methods, `u` and `v` for vectors
    grid: Grid,
    axes: AxesId,
    geometry: SubplotGeometry,
    options: PlotOptions,
    stage: Stage,
    /// Artists of the last draw; the first is the mappable
    cs: Vec<ArtistId>,
    colorbar: Option<AxesId>,
    key: Option<ArtistId>,
    labels: AxisLabels,
}

impl<B: PlotBackend> Plot2D<B> {
    /// Plot a scalar slab with coordinates `x` (columns) and `y` (rows);
    /// missing coordinates default to indices.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: B,
        method: PlotMethod,
        slab: ArrayViewD<'_, f64>,
        x: Option<Vec<f64>>,
        y: Option<Vec<f64>>,
        figure: &Figure,
        axes: AxesId,
        options: PlotOptions,
    ) -> Result<Self> {
        if method.is_vector() {
            return Err(GplotError::config(format!(
                "{} needs two components, use Plot2D::vector",
                method.name()
            )));
        }
        let z = get_slab(slab)?;
        trace!(stage = %Stage::SlabExtracted, shape = ?z.dim(), "Plot stage");
        let x = x.unwrap_or_else(|| index_coords(z.ncols()));
        let y = y.unwrap_or_else(|| index_coords(z.nrows()));
        check_coords(z.dim(), &x, &y)?;
        Self::build(backend, method, x, y, vec![z], figure, axes, options)
    }

    /// Plot a vector field with a quiver or barbs method. Sampling runs
    /// here so regridding errors surface before drawing.
    pub fn vector(
        backend: B,
        method: PlotMethod,
        field: VectorField,
        figure: &Figure,
        axes: AxesId,
        options: PlotOptions,
    ) -> Result<Self> {
        let method = method.validated()?;
        let Some(sampling) = method.sampling() else {
            return Err(GplotError::config(format!(
                "{} is not a vector method",
                method.name()
            )));
        };
        let sampled = sampling.sample(&field)?;
        trace!(stage = %Stage::SlabExtracted, shape = ?sampled.u.dim(), "Plot stage");
        let VectorField { u, v, x, y } = sampled;
        Self::build(backend, method, x, y, vec![u, v], figure, axes, options)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        backend: B,
        method: PlotMethod,
        x: Vec<f64>,
        y: Vec<f64>,
        fields: Vec<Array2<f64>>,
        figure: &Figure,
        axes: AxesId,
        options: PlotOptions,
    ) -> Result<Self> {
        options.validate()?;
        let geometry = figure
            .axes(axes)?
            .geometry
            .unwrap_or_else(SubplotGeometry::single);

        let grid = Grid {
            x: x.clone(),
            y: y.clone(),
            fields,
        };
        trace!(stage = %Stage::GridBuilt, "Plot stage");
        let grid = backend.prepare_grid(grid)?;
        trace!(stage = %Stage::BackendPrepared, backend = backend.name(), "Plot stage");

        debug!(
            method = method.name(),
            backend = backend.name(),
            nrows = geometry.nrows,
            ncols = geometry.ncols,
            index = geometry.index,
            "Created plot"
        );
        Ok(Self {
            backend,
            method,
            x,
            y,
            grid,
            axes,
            geometry,
            options,
            stage: Stage::BackendPrepared,
            cs: Vec::new(),
            colorbar: None,
            key: None,
            labels: AxisLabels::NONE,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn method(&self) -> &PlotMethod {
        &self.method
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn axes(&self) -> AxesId {
        self.axes
    }

    pub fn geometry(&self) -> &SubplotGeometry {
        &self.geometry
    }

    /// Colorbar axes created by the last full draw
    pub fn colorbar(&self) -> Option<AxesId> {
        self.colorbar
    }

    /// Label sides applied by the labeling stage
    pub fn labels(&self) -> AxisLabels {
        self.labels
    }

    /// Artists of the last draw, mappable first
    pub fn artists(&self) -> &[ArtistId] {
        &self.cs
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Full draw: data, axis labels, colorbar and title. Returns the
    /// mappable artist.
    pub fn draw(&mut self, figure: &mut Figure) -> Result<ArtistId> {
        log_timed_operation("plot_draw", || {
            let mappable = self.draw_data(figure)?;
            self.label_stage(figure)?;
            self.colorbar_stage(figure)?;
            if self.options.fix_aspect {
                let (width, height) = (figure.width_px, figure.height_px);
                figure.axes_mut(self.axes)?.apply_equal_aspect(width, height);
            }
            self.title_stage(figure)?;
            Ok(mappable)
        })
    }

    /// Replace the slab and redraw the data only; labels, colorbar and
    /// title are kept.
    pub fn update(&mut self, figure: &mut Figure, slab: ArrayViewD<'_, f64>) -> Result<ArtistId> {
        if self.method.is_vector() {
            return Err(GplotError::config(format!(
                "{} updates need two components, use update_vector",
                self.method.name()
            )));
        }
        let z = get_slab(slab)?;
        trace!(stage = %Stage::SlabExtracted, "Plot stage");
        check_coords(z.dim(), &self.x, &self.y)?;
        self.regrid_fields(vec![z])?;
        self.draw_data(figure)
    }

    /// Replace the vector field and redraw the data only
    pub fn update_vector(&mut self, figure: &mut Figure, field: VectorField) -> Result<ArtistId> {
        let Some(sampling) = self.method.sampling() else {
            return Err(GplotError::config(format!(
                "{} is not a vector method",
                self.method.name()
            )));
        };
        let sampled = sampling.sample(&field)?;
        trace!(stage = %Stage::SlabExtracted, "Plot stage");
        self.x = sampled.x;
        self.y = sampled.y;
        self.regrid_fields(vec![sampled.u, sampled.v])?;
        self.draw_data(figure)
    }

    fn regrid_fields(&mut self, fields: Vec<Array2<f64>>) -> Result<()> {
        let grid = Grid {
            x: self.x.clone(),
            y: self.y.clone(),
            fields,
        };
        trace!(stage = %Stage::GridBuilt, "Plot stage");
        self.grid = self.backend.prepare_grid(grid)?;
        trace!(stage = %Stage::BackendPrepared, "Plot stage");
        Ok(())
    }

    fn draw_data(&mut self, figure: &mut Figure) -> Result<ArtistId> {
        let axes = figure.axes_mut(self.axes)?;
        for id in self.cs.drain(..) {
            axes.remove_artist(id);
        }
        axes.facecolor = self.options.fill_color;

        let artists = self.method_artists()?;
        self.cs = artists
            .into_iter()
            .map(|artist| self.backend.draw_primitive(axes, artist))
            .collect();
        self.stage = Stage::Drawn;
        trace!(stage = %self.stage, artists = self.cs.len(), "Plot stage");

        self.cs.first().copied().ok_or_else(|| GplotError::ImageGeneration {
            message: format!("{} produced no artist", self.method.name()),
        })
    }

    fn field(&self, i: usize) -> Result<&Array2<f64>> {
        self.grid
            .fields
            .get(i)
            .ok_or_else(|| GplotError::shape(format!("Grid is missing field {}", i)))
    }

    fn extent(&self) -> [f64; 4] {
        let (x0, x1) = min_max(&self.grid.x);
        let (y0, y1) = min_max(&self.grid.y);
        [x0, x1, y0, y1]
    }

    /// Unprojected artists for the current grid
    fn method_artists(&self) -> Result<Vec<Artist>> {
        let x = self.grid.x.clone();
        let y = self.grid.y.clone();
        let artists = match &self.method {
            PlotMethod::Isofill(m) => {
                let z = self.field(0)?;
                let s = &m.scale;
                let mut out = vec![Artist::FilledContour(FilledContour {
                    x: x.clone(),
                    y: y.clone(),
                    z: z.clone(),
                    levels: s.levels.clone(),
                    cmap: s.cmap.clone(),
                    norm: s.norm.clone(),
                    extend: s.extend,
                    alpha: 1.0,
                })];
                if let Some(stroke) = m.stroke {
                    let n = s.levels.len();
                    out.push(Artist::ContourLines(ContourLines {
                        x,
                        y,
                        z: z.clone(),
                        levels: s.levels.clone(),
                        colors: vec![stroke.color; n],
                        linewidths: vec![stroke.linewidth; n],
                        dashed: vec![stroke.dashed; n],
                        alpha: 1.0,
                    }));
                }
                out
            }
            PlotMethod::Isoline(m) => vec![Artist::ContourLines(ContourLines {
                x,
                y,
                z: self.field(0)?.clone(),
                levels: m.scale.levels.clone(),
                colors: m.line_colors(),
                linewidths: m.line_widths(),
                dashed: m.dashes(),
                alpha: m.alpha,
            })],
            PlotMethod::Boxfill(m) => vec![Artist::Image(ImageArtist {
                z: self.field(0)?.clone(),
                extent: self.extent(),
                cmap: m.scale.cmap.clone(),
                norm: m.scale.norm.clone(),
                alpha: 1.0,
            })],
            PlotMethod::Pcolor(m) => vec![Artist::Mesh(MeshArtist {
                x,
                y,
                z: self.field(0)?.clone(),
                cmap: m.scale.cmap.clone(),
                norm: m.scale.norm.clone(),
                alpha: 1.0,
            })],
            PlotMethod::Hatch(m) => {
                let z = self.field(0)?;
                vec![Artist::Hatch(HatchArtist {
                    x,
                    y,
                    levels: hatch_levels(z),
                    z: z.clone(),
                    pattern: m.pattern,
                    color: m.color,
                    alpha: m.alpha,
                })]
            }
            PlotMethod::Shading(m) => {
                let z = self.field(0)?.mapv(|v| if v == 1.0 { 1.0 } else { f64::NAN });
                vec![Artist::FilledContour(FilledContour {
                    x,
                    y,
                    z,
                    levels: vec![0.5, 1.5],
                    cmap: m.cmap.clone(),
                    norm: LinearNorm::new(0.5, 1.5).into(),
                    extend: Default::default(),
                    alpha: m.alpha,
                })]
            }
            PlotMethod::Quiver(q) => vec![Artist::Quiver(QuiverArtist {
                x,
                y,
                u: self.field(0)?.clone(),
                v: self.field(1)?.clone(),
                scale: q.scale,
                width: q.linewidth,
                color: q.color,
                alpha: q.alpha,
            })],
            PlotMethod::Barbs(b) => vec![Artist::Barbs(BarbsArtist {
                x,
                y,
                u: self.field(0)?.clone(),
                v: self.field(1)?.clone(),
                length: b.length,
                increments: b.increments,
                color: b.color,
                alpha: b.alpha,
            })],
            PlotMethod::Gis(g) => vec![Artist::Imagery(Imagery {
                service: g.service.clone(),
                xpixels: g.xpixels,
                dpi: g.dpi,
                extent: self.extent(),
                image: g.image.clone(),
            })],
        };
        Ok(artists)
    }

    fn label_stage(&mut self, figure: &mut Figure) -> Result<()> {
        let imagery = matches!(self.method, PlotMethod::Gis(_));
        let clean = self.options.clean;
        let units = self.options.units.clone();
        let fontsize = self.options.fontsize;
        let axes = figure.axes_mut(self.axes)?;

        self.backend.overlay_basemap(axes, clean, imagery);
        if clean {
            axes.clear_ticks();
            axes.visible_frame = false;
            self.labels = AxisLabels::NONE;
        } else {
            self.labels = self.options.label_axes.resolve(&self.geometry);
            let decoration = AxisDecoration {
                x: &self.x,
                y: &self.y,
                labels: self.labels,
                hide_labels: self.options.label_axes == LabelAxes::Off,
                grid: self.options.axes_grid,
                grid_color: self.backend.grid_color(self.options.fill_color),
            };
            self.backend.label_axes(axes, &decoration);
        }

        if let PlotMethod::Quiver(q) = &self.method {
            let field = VectorField {
                u: self.field(0)?.clone(),
                v: self.field(1)?.clone(),
                x: self.grid.x.clone(),
                y: self.grid.y.clone(),
            };
            let axes = figure.axes_mut(self.axes)?;
            if let Some(previous) = self.key.take() {
                axes.remove_artist(previous);
            }
            if let Some(key) = q.key(&field, &units) {
                self.key = Some(axes.add_artist(Artist::QuiverKey(QuiverKeyArtist {
                    x: key.x,
                    y: key.y,
                    length: key.length,
                    label: key.label,
                    fontsize,
                })));
            }
        }

        self.stage = Stage::AxesLabeled;
        trace!(stage = %self.stage, labels = ?self.labels, "Plot stage");
        Ok(())
    }

    fn colorbar_stage(&mut self, figure: &mut Figure) -> Result<()> {
        self.stage = Stage::ColorbarPlaced;
        if self.options.clean || !self.method.has_colorbar() {
            return Ok(());
        }
        // Layout changes happen once; redraws refill the existing colorbar
        let cbar_axes = match self.colorbar {
            Some(id) => {
                figure.axes_mut(id)?.clear_artists();
                id
            }
            None => match self.place_colorbar_axes(figure)? {
                Some(rect) => figure.add_axes(rect),
                None => {
                    trace!(stage = %self.stage, "No colorbar for this panel");
                    return Ok(());
                }
            },
        };
        let Some(scale) = self.method.scale() else {
            return Ok(());
        };
        let orientation = self.options.legend_orientation;
        let fontsize = self.options.fontsize;

        let contour = self.method.is_contour();
        let spacing = match &self.method {
            PlotMethod::Isofill(m) => m
                .table
                .as_ref()
                .map_or(TickSpacing::Proportional, |table| table.spacing()),
            _ => TickSpacing::Proportional,
        };
        let ticks = if contour {
            let (values, labels) = match &self.method {
                PlotMethod::Isofill(m) => match &m.table {
                    Some(table) => (
                        table.ticks().to_vec(),
                        table
                            .tick_labels()
                            .map(<[String]>::to_vec)
                            .unwrap_or_else(|| format_ticks(table.ticks())),
                    ),
                    None => (scale.levels.clone(), format_ticks(&scale.levels)),
                },
                _ => (scale.levels.clone(), format_ticks(&scale.levels)),
            };
            let (lo, hi) = min_max(&scale.levels);
            stagger_ticks(&values, &labels, lo, hi, orientation, scale.extend)
        } else {
            let values = ticks_within(scale.norm.vmin(), scale.norm.vmax(), &MaxNLocator::default());
            TickLayout::plain(&values, &format_ticks(&values))
        };

        let cax = figure.axes_mut(cbar_axes)?;
        cax.visible_frame = false;
        cax.add_artist(Artist::Colorbar(ColorbarArtist {
            orientation,
            cmap: scale.cmap.clone(),
            norm: scale.norm.clone(),
            extend: scale.extend,
            boundaries: contour.then(|| scale.levels.clone()),
            drawedges: contour,
            ticks,
            spacing,
        }));
        if !self.options.units.is_empty() {
            let text = match orientation {
                Orientation::Horizontal => {
                    TextArtist::axes(self.options.units.clone(), 1.02, 0.5, fontsize)
                        .aligned(HAlign::Left, VAlign::Center)
                }
                Orientation::Vertical => {
                    TextArtist::axes(self.options.units.clone(), 0.5, -0.05, fontsize)
                        .aligned(HAlign::Left, VAlign::Top)
                }
            };
            cax.add_artist(Artist::Text(text));
        }
        self.colorbar = Some(cbar_axes);
        debug!(
            method = self.method.name(),
            orientation = %orientation,
            extend = %scale.extend,
            "Placed colorbar"
        );
        Ok(())
    }

    /// Place a new colorbar slot, shrinking the parent or the subplot
    /// grid to make room
    fn place_colorbar_axes(&self, figure: &mut Figure) -> Result<Option<Rect>> {
        let orientation = self.options.legend_orientation;
        let fontsize = self.options.fontsize;

        let axes = figure.axes(self.axes)?;
        let (_, label_px) = figure.text_extent("0.0", fontsize);
        let axes_height_px = axes.rect.height * figure.height_px as f64;
        let request = ColorbarRequest {
            scope: self.options.legend,
            orientation,
            geometry: self.geometry,
            contour_method: self.method.is_contour(),
            constrained_layout: figure.constrained_layout,
            parent: axes.rect,
            decoration: decoration_extent(figure, axes, orientation, fontsize),
            label_height_axes: if axes_height_px > 0.0 {
                label_px / axes_height_px
            } else {
                0.0
            },
            label_height_figure: label_px / figure.height_px.max(1) as f64,
            figure_px: (figure.width_px, figure.height_px),
            subplot_union: figure.subplot_union(),
        };

        let rect = match place_colorbar(&request) {
            None => return Ok(None),
            Some(ColorbarPlacement::Attached(attached)) => {
                let axes = figure.axes_mut(self.axes)?;
                axes.rect = attached.parent;
                axes.pinned = true;
                attached.colorbar
            }
            Some(ColorbarPlacement::Shared {
                colorbar,
                adjust,
                fit_axes,
            }) => {
                if let Some(adjust) = adjust {
                    figure.subplots_adjust(adjust);
                }
                if let Some(target) = fit_axes {
                    figure.fit_axes_into(target);
                }
                colorbar
            }
        };

        Ok(Some(rect))
    }

    fn title_stage(&mut self, figure: &mut Figure) -> Result<()> {
        self.stage = Stage::Titled;
        if self.options.clean {
            return Ok(());
        }
        let title = panel_title(self.options.title.as_deref(), &self.geometry)?;
        let fontsize = effective_fontsize(self.options.fontsize, &self.geometry);
        let axes = figure.axes_mut(self.axes)?;
        axes.title = title.map(|text| Title { text, fontsize });
        trace!(stage = %self.stage, "Plot stage");
        Ok(())
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Hatch levels over the data range: one when the mask is all zeros,
/// three otherwise. Only the band above the second level is hatched.
fn hatch_levels(z: &Array2<f64>) -> Vec<f64> {
    let pool = pool_finite(&[z.view().into_dyn()]);
    let all_zero = pool.iter().all(|&v| v == 0.0);
    let nlevel = if all_zero { 1 } else { 3 };
    let (lo, hi) = min_max(&pool);
    if lo > hi {
        return Vec::new();
    }
    MaxNLocator::new(nlevel + 1).tick_values(lo, hi)
}
