//! Drawing backends.
//!
//! A backend owns the coordinate system of an axes: it projects data
//! coordinates before artists are appended, prepares grids for its
//! projection, adds basemap overlays and labels the axes. The orchestrator
//! is generic over [`PlotBackend`] so plain and geographic plots share one
//! drawing pipeline.

pub mod geo;
pub mod plain;

use ndarray::Array2;

use crate::canvas::artist::{Artist, Polylines};
use crate::canvas::figure::{ArtistId, Axes, TickSet};
use crate::error::Result;
use crate::layout::geometry::{AxisLabels, SideFlags};

pub use geo::{wrap_longitude, GeoBackend, MapProjection};
pub use plain::PlainBackend;

/// Grid line color of plain axes
pub const PLAIN_GRID_COLOR: [u8; 4] = [176, 176, 176, 255];

/// Rectilinear grid with one or more fields sharing its coordinates.
/// Fields have rows along `y` and columns along `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub fields: Vec<Array2<f64>>,
}

/// Axis decoration requested by the labeling stage
#[derive(Debug, Clone)]
pub struct AxisDecoration<'a> {
    /// Unprojected coordinates of the plotted grid
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub labels: AxisLabels,
    /// Tick labels are hidden but ticks stay
    pub hide_labels: bool,
    pub grid: bool,
    pub grid_color: [u8; 4],
}

pub trait PlotBackend {
    fn name(&self) -> &'static str;

    /// Map a data coordinate into the axes coordinate system
    fn project(&self, x: f64, y: f64) -> (f64, f64);

    /// Adapt a grid before drawing; the default leaves it unchanged
    fn prepare_grid(&self, grid: Grid) -> Result<Grid> {
        Ok(grid)
    }

    /// Project the coordinate axes of a rectilinear grid
    fn project_axes(&self, x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let y_ref = y.get(y.len() / 2).copied().unwrap_or(0.0);
        let x_ref = x.get(x.len() / 2).copied().unwrap_or(0.0);
        (
            x.iter().map(|&xi| self.project(xi, y_ref).0).collect(),
            y.iter().map(|&yi| self.project(x_ref, yi).1).collect(),
        )
    }

    /// Rewrite the coordinates of an artist into the axes coordinate system
    fn project_artist(&self, artist: Artist) -> Artist {
        project_artist_axes(artist, |x, y| self.project_axes(x, y), |x, y| self.project(x, y))
    }

    /// Project an artist, grow the axes limits to its extent and append it
    fn draw_primitive(&self, axes: &mut Axes, artist: Artist) -> ArtistId {
        let artist = self.project_artist(artist);
        if let Some((xr, yr)) = artist_extent(&artist) {
            axes.xlim = Some(union_range(axes.xlim, xr));
            axes.ylim = Some(union_range(axes.ylim, yr));
        }
        axes.add_artist(artist)
    }

    /// Grid line color given the missing-data fill color
    fn grid_color(&self, _fill_color: [u8; 4]) -> [u8; 4] {
        PLAIN_GRID_COLOR
    }

    /// Coastline or other map decoration; `clean` and imagery plots skip it
    fn overlay_basemap(&self, axes: &mut Axes, clean: bool, imagery: bool);

    /// Ticks, tick labels and optional grid lines
    fn label_axes(&self, axes: &mut Axes, decoration: &AxisDecoration<'_>);
}

fn project_artist_axes<A, P>(artist: Artist, axes_fn: A, point_fn: P) -> Artist
where
    A: Fn(&[f64], &[f64]) -> (Vec<f64>, Vec<f64>),
    P: Fn(f64, f64) -> (f64, f64),
{
    macro_rules! reproject {
        ($variant:ident, $a:ident) => {{
            let (x, y) = axes_fn(&$a.x, &$a.y);
            $a.x = x;
            $a.y = y;
            Artist::$variant($a)
        }};
    }
    let extent = |e: [f64; 4]| {
        let (x0, y0) = point_fn(e[0], e[2]);
        let (x1, y1) = point_fn(e[1], e[3]);
        [x0, x1, y0, y1]
    };
    match artist {
        Artist::FilledContour(mut a) => reproject!(FilledContour, a),
        Artist::ContourLines(mut a) => reproject!(ContourLines, a),
        Artist::Mesh(mut a) => reproject!(Mesh, a),
        Artist::Hatch(mut a) => reproject!(Hatch, a),
        Artist::Quiver(mut a) => reproject!(Quiver, a),
        Artist::Barbs(mut a) => reproject!(Barbs, a),
        Artist::Image(mut a) => {
            a.extent = extent(a.extent);
            Artist::Image(a)
        }
        Artist::Imagery(mut a) => {
            a.extent = extent(a.extent);
            Artist::Imagery(a)
        }
        other => other,
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    (lo <= hi).then_some((lo, hi))
}

/// Data extent `((xmin, xmax), (ymin, ymax))` of a data-space artist
pub fn artist_extent(artist: &Artist) -> Option<((f64, f64), (f64, f64))> {
    let axes = |x: &[f64], y: &[f64]| Some((min_max(x)?, min_max(y)?));
    match artist {
        Artist::FilledContour(a) => axes(&a.x, &a.y),
        Artist::ContourLines(a) => axes(&a.x, &a.y),
        Artist::Mesh(a) => axes(&a.x, &a.y),
        Artist::Hatch(a) => axes(&a.x, &a.y),
        Artist::Quiver(a) => axes(&a.x, &a.y),
        Artist::Barbs(a) => axes(&a.x, &a.y),
        Artist::Image(a) => Some(((a.extent[0], a.extent[1]), (a.extent[2], a.extent[3]))),
        Artist::Imagery(a) => Some(((a.extent[0], a.extent[1]), (a.extent[2], a.extent[3]))),
        _ => None,
    }
}

fn union_range(current: Option<(f64, f64)>, add: (f64, f64)) -> (f64, f64) {
    match current {
        Some((lo, hi)) => (lo.min(add.0), hi.max(add.1)),
        None => add,
    }
}

/// Grid lines through the tick positions, spanning the axes limits
pub(crate) fn grid_lines(axes: &Axes, color: [u8; 4]) -> Option<Polylines> {
    let (x0, x1) = axes.xlim?;
    let (y0, y1) = axes.ylim?;
    let mut lines: Vec<Vec<(f64, f64)>> = axes
        .xticks
        .values
        .iter()
        .map(|&x| vec![(x, y0), (x, y1)])
        .collect();
    lines.extend(axes.yticks.values.iter().map(|&y| vec![(x0, y), (x1, y)]));
    Some(Polylines {
        lines,
        color,
        linewidth: 0.5,
    })
}

/// Tick set with labels only on the requested sides
pub(crate) fn tick_set(values: Vec<f64>, labels: Vec<String>, sides: SideFlags, hide: bool) -> TickSet {
    TickSet {
        labels: if hide || !sides.any() { Vec::new() } else { labels },
        values,
        sides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::artist::{ImageArtist, MeshArtist};
    use crate::canvas::Figure;
    use crate::colormaps::{get_colormap, LinearNorm};

    struct Shifted;

    impl PlotBackend for Shifted {
        fn name(&self) -> &'static str {
            "shifted"
        }

        fn project(&self, x: f64, y: f64) -> (f64, f64) {
            (x - 100.0, y * 2.0)
        }

        fn overlay_basemap(&self, _axes: &mut Axes, _clean: bool, _imagery: bool) {}

        fn label_axes(&self, _axes: &mut Axes, _decoration: &AxisDecoration<'_>) {}
    }

    #[test]
    fn test_draw_primitive_projects_and_fits_limits() {
        let mut figure = Figure::default();
        let id = figure.add_subplot(1, 1, 1).unwrap();
        let axes = figure.axes_mut(id).unwrap();

        let mesh = Artist::Mesh(MeshArtist {
            x: vec![100.0, 110.0, 120.0],
            y: vec![0.0, 5.0],
            z: Array2::zeros((2, 3)),
            cmap: get_colormap("viridis").unwrap(),
            norm: LinearNorm::new(0.0, 1.0).into(),
            alpha: 1.0,
        });
        let artist_id = Shifted.draw_primitive(axes, mesh);
        assert_eq!(axes.xlim, Some((0.0, 20.0)));
        assert_eq!(axes.ylim, Some((0.0, 10.0)));
        let Some(Artist::Mesh(mesh)) = axes.artist(artist_id) else {
            panic!("mesh not stored");
        };
        assert_eq!(mesh.x, vec![0.0, 10.0, 20.0]);

        let image = Artist::Image(ImageArtist {
            z: Array2::zeros((2, 2)),
            extent: [90.0, 130.0, -1.0, 6.0],
            cmap: get_colormap("viridis").unwrap(),
            norm: LinearNorm::new(0.0, 1.0).into(),
            alpha: 1.0,
        });
        Shifted.draw_primitive(axes, image);
        assert_eq!(axes.xlim, Some((-10.0, 30.0)));
        assert_eq!(axes.ylim, Some((-2.0, 12.0)));
        assert_eq!(axes.artist_count(), 2);
    }
}
