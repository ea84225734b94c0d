//! Plate Carrée geographic backend.
//!
//! Longitudes are shifted by the central longitude of the projection so the
//! map is centered on the plotted domain. Global grids get a cyclic column
//! so the seam at the wrap-around longitude is closed.

use std::fmt;
use std::str::FromStr;

use ndarray::{concatenate, s, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::artist::{Artist, Polylines};
use crate::canvas::figure::Axes;
use crate::error::{GplotError, Result};
use crate::layout::ticks::{axis_ticks, format_latitude, format_longitude, MaxNLocator};

use super::{grid_lines, tick_set, AxisDecoration, Grid, PlotBackend};

/// Map projection center
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProjection {
    /// Centered on the middle of the plotted longitudes
    #[default]
    Cyl,
    /// Centered on Greenwich
    Eurocentric,
    /// Centered on 90°W
    Americas,
    /// Centered on the dateline
    Pacific,
    Custom(f64),
}

impl MapProjection {
    /// Center longitude, resolved against the plotted longitudes for `Cyl`
    pub fn center_longitude(&self, lons: &[f64]) -> f64 {
        match self {
            MapProjection::Cyl => lons.get(lons.len() / 2).copied().unwrap_or(0.0),
            MapProjection::Eurocentric => 0.0,
            MapProjection::Americas => -90.0,
            MapProjection::Pacific => 180.0,
            MapProjection::Custom(lon) => *lon,
        }
    }
}

impl FromStr for MapProjection {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cyl" => Ok(MapProjection::Cyl),
            "eurocentric" => Ok(MapProjection::Eurocentric),
            "americas" => Ok(MapProjection::Americas),
            "pacific" => Ok(MapProjection::Pacific),
            other => match other.strip_prefix("custom:") {
                Some(lon) => lon.parse::<f64>().map(MapProjection::Custom).map_err(|_| {
                    GplotError::invalid("projection", format!("Invalid custom projection format: {}", s))
                }),
                None => Err(GplotError::invalid(
                    "projection",
                    format!("Unknown map projection: {}", s),
                )),
            },
        }
    }
}

impl fmt::Display for MapProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapProjection::Cyl => f.write_str("cyl"),
            MapProjection::Eurocentric => f.write_str("eurocentric"),
            MapProjection::Americas => f.write_str("americas"),
            MapProjection::Pacific => f.write_str("pacific"),
            MapProjection::Custom(lon) => write!(f, "custom:{}", lon),
        }
    }
}

/// Wrap a longitude into `[-180, 180]`. Positive multiples of 180 map to
/// 180 and negative ones to -180.
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// `true` when the longitudes plus one more step cover the whole circle
pub fn is_global(lons: &[f64]) -> bool {
    let (first, second, last) = match lons {
        [first, second, .., last] => (*first, *second, *last),
        _ => return false,
    };
    let step = (second - first).abs();
    step > 0.0 && ((last - first).abs() + step - 360.0).abs() < step * 0.5
}

/// Append the first column after the last one, one step further east
pub fn add_cyclic_point(grid: Grid) -> Result<Grid> {
    let Grid { mut x, y, fields } = grid;
    let step = match x.as_slice() {
        [first, second, ..] => second - first,
        _ => return Err(GplotError::shape("Cyclic point needs at least 2 longitudes")),
    };
    let last = x[x.len() - 1];
    x.push(last + step);
    let fields = fields
        .iter()
        .map(|field| {
            let first = field.slice(s![.., 0..1]);
            concatenate(Axis(1), &[field.view(), first]).map_err(GplotError::from)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Grid { x, y, fields })
}

// Coarse continental outlines, (lon, lat)
const COASTLINES: &[&[(f64, f64)]] = &[
    // North America
    &[
        (-168.0, 66.0), (-156.0, 71.0), (-130.0, 70.0), (-95.0, 72.0), (-80.0, 73.0),
        (-62.0, 60.0), (-56.0, 52.0), (-66.0, 45.0), (-76.0, 35.0), (-81.0, 25.0),
        (-90.0, 29.0), (-97.0, 26.0), (-97.0, 21.0), (-87.0, 21.0), (-83.0, 10.0),
        (-77.0, 8.0), (-86.0, 12.0), (-105.0, 20.0), (-110.0, 23.0), (-117.0, 32.0),
        (-124.0, 40.0), (-124.0, 48.0), (-135.0, 58.0), (-150.0, 60.0), (-165.0, 60.0),
        (-168.0, 66.0),
    ],
    // South America
    &[
        (-77.0, 8.0), (-72.0, 12.0), (-60.0, 10.0), (-50.0, 0.0), (-35.0, -7.0),
        (-39.0, -15.0), (-48.0, -26.0), (-58.0, -35.0), (-65.0, -42.0), (-68.0, -52.0),
        (-74.0, -52.0), (-73.0, -40.0), (-71.0, -30.0), (-70.0, -18.0), (-76.0, -14.0),
        (-81.0, -5.0), (-80.0, 1.0), (-77.0, 8.0),
    ],
    // Eurasia
    &[
        (-10.0, 36.0), (-9.0, 43.0), (-2.0, 44.0), (-5.0, 48.0), (2.0, 51.0),
        (8.0, 54.0), (10.0, 57.0), (5.0, 61.0), (15.0, 68.0), (25.0, 71.0),
        (40.0, 67.0), (60.0, 70.0), (80.0, 73.0), (105.0, 78.0), (140.0, 72.0),
        (170.0, 70.0), (179.0, 65.0), (163.0, 59.0), (157.0, 51.0), (142.0, 59.0),
        (135.0, 54.0), (141.0, 46.0), (130.0, 42.0), (127.0, 35.0), (121.0, 31.0),
        (122.0, 25.0), (110.0, 20.0), (106.0, 10.0), (100.0, 13.0), (98.0, 8.0),
        (103.0, 1.0), (98.0, 16.0), (93.0, 20.0), (88.0, 22.0), (80.0, 15.0),
        (77.0, 8.0), (72.0, 20.0), (67.0, 25.0), (57.0, 25.0), (52.0, 27.0),
        (48.0, 30.0), (56.0, 24.0), (59.0, 22.0), (52.0, 16.0), (43.0, 13.0),
        (37.0, 22.0), (33.0, 28.0), (32.0, 31.0), (35.0, 36.0), (27.0, 37.0),
        (26.0, 40.0), (22.0, 37.0), (18.0, 40.0), (12.0, 44.0), (15.0, 41.0),
        (8.0, 44.0), (3.0, 43.0), (-1.0, 37.0), (-6.0, 36.0), (-10.0, 36.0),
    ],
    // Africa
    &[
        (-6.0, 36.0), (10.0, 37.0), (20.0, 32.0), (32.0, 31.0), (33.0, 28.0),
        (43.0, 12.0), (51.0, 12.0), (40.0, -2.0), (40.0, -15.0), (35.0, -25.0),
        (27.0, -34.0), (18.0, -34.0), (12.0, -17.0), (9.0, -1.0), (9.0, 4.0),
        (-8.0, 4.0), (-17.0, 14.0), (-17.0, 21.0), (-10.0, 30.0), (-6.0, 36.0),
    ],
    // Australia
    &[
        (114.0, -22.0), (129.0, -15.0), (136.0, -12.0), (142.0, -11.0), (146.0, -19.0),
        (153.0, -25.0), (150.0, -37.0), (141.0, -38.0), (132.0, -32.0), (115.0, -34.0),
        (114.0, -22.0),
    ],
    // Greenland
    &[
        (-45.0, 60.0), (-55.0, 65.0), (-70.0, 77.0), (-60.0, 82.0), (-30.0, 83.0),
        (-20.0, 75.0), (-22.0, 70.0), (-45.0, 60.0),
    ],
    // Antarctica
    &[
        (-180.0, -78.0), (-150.0, -76.0), (-100.0, -73.0), (-60.0, -64.0), (-30.0, -77.0),
        (0.0, -70.0), (40.0, -69.0), (90.0, -66.0), (140.0, -66.0), (170.0, -72.0),
        (180.0, -78.0),
    ],
    // Great Britain
    &[(-5.0, 50.0), (1.0, 51.0), (-2.0, 57.0), (-5.0, 58.0), (-6.0, 55.0), (-5.0, 50.0)],
    // Japan
    &[(130.0, 31.0), (141.0, 36.0), (142.0, 43.0), (145.0, 44.0), (140.0, 41.0), (133.0, 34.0), (130.0, 31.0)],
];

const COASTLINE_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Geographic backend over a Plate Carrée projection
#[derive(Debug, Clone)]
pub struct GeoBackend {
    projection: MapProjection,
    central_longitude: f64,
    locator: MaxNLocator,
}

impl GeoBackend {
    /// Backend for a grid with longitudes `lons`
    pub fn new(projection: MapProjection, lons: &[f64]) -> Self {
        let central_longitude = projection.center_longitude(lons);
        debug!(
            projection = %projection,
            central_longitude = central_longitude,
            "Created geographic backend"
        );
        Self {
            projection,
            central_longitude,
            locator: MaxNLocator::default(),
        }
    }

    pub fn projection(&self) -> MapProjection {
        self.projection
    }

    pub fn central_longitude(&self) -> f64 {
        self.central_longitude
    }

    /// Coastlines in axes coordinates, split at the seam and clipped to
    /// the axes limits
    fn coastlines(&self, xlim: (f64, f64), ylim: (f64, f64)) -> Polylines {
        let inside = |(x, y): (f64, f64)| x >= xlim.0 && x <= xlim.1 && y >= ylim.0 && y <= ylim.1;
        let mut lines = Vec::new();
        for outline in COASTLINES {
            let mut current: Vec<(f64, f64)> = Vec::new();
            for &(lon, lat) in outline.iter() {
                let point = (wrap_longitude(lon - self.central_longitude), lat);
                let jump = current.last().map_or(false, |last| (point.0 - last.0).abs() > 180.0);
                if jump || !inside(point) {
                    if current.len() > 1 {
                        lines.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                if inside(point) {
                    current.push(point);
                }
            }
            if current.len() > 1 {
                lines.push(current);
            }
        }
        Polylines {
            lines,
            color: COASTLINE_COLOR,
            linewidth: 1.0,
        }
    }
}

impl PlotBackend for GeoBackend {
    fn name(&self) -> &'static str {
        "geo"
    }

    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon - self.central_longitude, lat)
    }

    fn prepare_grid(&self, grid: Grid) -> Result<Grid> {
        if is_global(&grid.x) {
            debug!(nx = grid.x.len(), "Adding cyclic point to global grid");
            add_cyclic_point(grid)
        } else {
            Ok(grid)
        }
    }

    /// Gridliner lines share the fill color
    fn grid_color(&self, fill_color: [u8; 4]) -> [u8; 4] {
        fill_color
    }

    fn overlay_basemap(&self, axes: &mut Axes, clean: bool, imagery: bool) {
        if clean || imagery {
            return;
        }
        let (Some(xlim), Some(ylim)) = (axes.xlim, axes.ylim) else {
            return;
        };
        axes.add_artist(Artist::Coastlines(self.coastlines(xlim, ylim)));
    }

    fn label_axes(&self, axes: &mut Axes, decoration: &AxisDecoration<'_>) {
        let lon_ticks = axis_ticks(decoration.x, &self.locator);
        let lat_ticks = axis_ticks(decoration.y, &self.locator);
        let lon_labels = lon_ticks.iter().map(|&l| format_longitude(l)).collect();
        let lat_labels = lat_ticks.iter().map(|&l| format_latitude(l)).collect();
        let (xs, ys) = self.project_axes(&lon_ticks, &lat_ticks);

        axes.xticks = tick_set(xs, lon_labels, decoration.labels.category, decoration.hide_labels);
        axes.yticks = tick_set(ys, lat_labels, decoration.labels.value, decoration.hide_labels);

        // gridliner lines follow the labels
        if decoration.grid && !decoration.hide_labels {
            if let Some(lines) = grid_lines(axes, decoration.grid_color) {
                axes.add_artist(Artist::GridLines(lines));
            }
        }
    }
}
