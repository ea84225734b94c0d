//! Discrete level tables and the colormap they derive.

use std::sync::Arc;

use serde::Serialize;

use crate::colormaps::{
    get_colormap, BoundaryNorm, Colormap, Extend, DEFAULT_COLORMAP, LinearNorm, ListedColormap, Norm,
};
use crate::error::{GplotError, Result};

/// One entry of a level table.
///
/// An absent bound marks an open interval and is only allowed on the first
/// (`vmin`) or last (`vmax`) level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub rgb: [u8; 3],
    pub label: String,
}

impl Level {
    pub fn new(vmin: Option<f64>, vmax: Option<f64>, rgb: [u8; 3], label: impl Into<String>) -> Self {
        Self {
            vmin,
            vmax,
            rgb,
            label: label.into(),
        }
    }

    fn is_open(&self) -> bool {
        self.vmin.is_none() || self.vmax.is_none()
    }

    fn rgba(&self) -> [u8; 4] {
        [self.rgb[0], self.rgb[1], self.rgb[2], 255]
    }
}

/// Colorbar tick spacing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickSpacing {
    /// Ticks at the bin edges, spaced by value
    Proportional,
    /// Ticks at the bin centers, one slot per labeled band
    Uniform,
}

/// Immutable colormap derived from a level table
#[derive(Debug, Clone)]
pub struct LevelColorMap {
    name: String,
    unit: String,
    description: String,
    levels: Vec<Level>,
    bin_edges: Vec<f64>,
    bin_centers: Vec<f64>,
    cmap: Arc<ListedColormap>,
    norm: Norm,
    extend: Extend,
    labels: Vec<String>,
    ticks: Vec<f64>,
    tick_labels: Option<Vec<String>>,
    spacing: TickSpacing,
}

fn centers_of(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

fn required(bound: Option<f64>, what: &str, index: usize) -> Result<f64> {
    bound.ok_or_else(|| GplotError::Colormap {
        message: format!("Level {} must have a {} bound", index, what),
    })
}

struct Derived {
    bin_edges: Vec<f64>,
    cmap: ListedColormap,
    norm: Norm,
    extend: Extend,
    labels: Vec<String>,
}

impl LevelColorMap {
    /// Derive the colormap of a level table.
    ///
    /// No levels gives the default linear map over `[-1, 1]`; one level a
    /// single-color map. Otherwise an open first/last level becomes the
    /// under/over color and the levels between define the bins.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        description: impl Into<String>,
        levels: Vec<Level>,
    ) -> Result<Self> {
        let name = name.into();
        let name = if name.is_empty() {
            "my_cmap".to_string()
        } else {
            name
        };

        let derived = match levels.len() {
            0 => Self::derive_default(&name)?,
            1 => Self::derive_single(&name, &levels[0])?,
            _ => Self::derive_from_levels(&name, &levels)?,
        };

        let bin_centers = centers_of(&derived.bin_edges);
        let (ticks, tick_labels, spacing) = if derived.labels.iter().all(|l| l.is_empty()) {
            (derived.bin_edges.clone(), None, TickSpacing::Proportional)
        } else {
            (
                bin_centers.clone(),
                Some(derived.labels.clone()),
                TickSpacing::Uniform,
            )
        };

        Ok(Self {
            name,
            unit: unit.into(),
            description: description.into(),
            levels,
            bin_edges: derived.bin_edges,
            bin_centers,
            cmap: Arc::new(derived.cmap),
            norm: derived.norm,
            extend: derived.extend,
            labels: derived.labels,
            ticks,
            tick_labels,
            spacing,
        })
    }

    fn derive_default(name: &str) -> Result<Derived> {
        let n = 256;
        let bin_edges: Vec<f64> = (0..n)
            .map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64)
            .collect();
        let ramp = get_colormap(DEFAULT_COLORMAP)?;
        let colors = centers_of(&bin_edges)
            .iter()
            .map(|&c| ramp.map_normalized((c + 1.0) / 2.0))
            .collect();
        Ok(Derived {
            bin_edges,
            cmap: ListedColormap::new(name, colors),
            norm: Norm::Linear(LinearNorm::new(-1.0, 1.0)),
            extend: Extend::Neither,
            labels: vec![String::new()],
        })
    }

    fn derive_single(name: &str, level: &Level) -> Result<Derived> {
        let vmin = required(level.vmin, "lower", 0)?;
        let vmax = required(level.vmax, "upper", 0)?;
        Ok(Derived {
            bin_edges: vec![vmin, vmax],
            cmap: ListedColormap::single(name, level.rgba()),
            norm: Norm::Linear(LinearNorm::new(vmin, vmax)),
            extend: Extend::Neither,
            labels: vec![level.label.clone()],
        })
    }

    fn derive_from_levels(name: &str, levels: &[Level]) -> Result<Derived> {
        let first = &levels[0];
        let last = &levels[levels.len() - 1];
        let extend_left = first.is_open();
        let extend_right = last.is_open();
        let extend = Extend::from_flags(extend_left, extend_right);

        let start = usize::from(extend_left);
        let end = levels.len() - usize::from(extend_right);
        if start >= end {
            return Err(GplotError::Colormap {
                message: format!("Colormap {} has no closed levels", name),
            });
        }
        let mid = &levels[start..end];
        for (offset, level) in mid.iter().enumerate() {
            required(level.vmin, "lower", start + offset)?;
            required(level.vmax, "upper", start + offset)?;
        }

        let point_case = mid.iter().all(|l| l.vmin == l.vmax);
        let bin_edges = if point_case {
            if mid.len() < 2 {
                return Err(GplotError::Colormap {
                    message: format!(
                        "Colormap {} needs at least 2 point levels to derive bin edges",
                        name
                    ),
                });
            }
            let centers: Vec<f64> = mid.iter().filter_map(|l| l.vmin).collect();
            let n = centers.len();
            let mut padded = Vec::with_capacity(n + 2);
            padded.push(2.0 * centers[0] - centers[1]);
            padded.extend_from_slice(&centers);
            padded.push(2.0 * centers[n - 1] - centers[n - 2]);
            centers_of(&padded)
        } else {
            let mut edges = Vec::with_capacity(mid.len() + 1);
            edges.extend(mid[0].vmin);
            edges.extend(mid.iter().filter_map(|l| l.vmax));
            edges
        };

        let colors = mid.iter().map(Level::rgba).collect();
        let under = extend_left.then(|| first.rgba());
        let over = extend_right.then(|| last.rgba());
        let cmap = ListedColormap::new(name, colors).with_extremes(under, over);
        let norm = BoundaryNorm::new(bin_edges.clone()).map_err(|e| GplotError::Colormap {
            message: format!("Colormap {}: {}", name, e),
        })?;

        Ok(Derived {
            bin_edges,
            cmap,
            norm: Norm::Boundary(norm),
            extend,
            labels: mid.iter().map(|l| l.label.clone()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    pub fn bin_centers(&self) -> &[f64] {
        &self.bin_centers
    }

    /// The discrete colormap, with under/over colors for open ends
    pub fn listed(&self) -> &ListedColormap {
        &self.cmap
    }

    pub fn cmap(&self) -> Arc<dyn Colormap> {
        self.cmap.clone()
    }

    pub fn norm(&self) -> &Norm {
        &self.norm
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    pub fn tick_labels(&self) -> Option<&[String]> {
        self.tick_labels.as_deref()
    }

    pub fn spacing(&self) -> TickSpacing {
        self.spacing
    }

    /// Color of a data value under this table
    pub fn color_of(&self, value: f64) -> [u8; 4] {
        self.cmap.lookup(self.norm.normalize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn banded() -> Vec<Level> {
        vec![
            Level::new(None, Some(0.0), [0, 0, 255], ""),
            Level::new(Some(0.0), Some(10.0), [0, 255, 0], ""),
            Level::new(Some(10.0), Some(20.0), [255, 255, 0], ""),
            Level::new(Some(20.0), None, [255, 0, 0], ""),
        ]
    }

    #[test]
    fn test_banded_levels() {
        let cmap = LevelColorMap::new("t", "K", "", banded()).unwrap();
        assert_eq!(cmap.bin_edges(), &[0.0, 10.0, 20.0]);
        assert_eq!(cmap.bin_centers(), &[5.0, 15.0]);
        assert_eq!(cmap.extend(), Extend::Both);
        assert_eq!(cmap.listed().len(), 2);
        assert_eq!(cmap.spacing(), TickSpacing::Proportional);
        assert_eq!(cmap.ticks(), cmap.bin_edges());
        assert!(cmap.tick_labels().is_none());

        assert_eq!(cmap.color_of(-5.0), [0, 0, 255, 255]);
        assert_eq!(cmap.color_of(5.0), [0, 255, 0, 255]);
        assert_eq!(cmap.color_of(15.0), [255, 255, 0, 255]);
        assert_eq!(cmap.color_of(25.0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_one_sided_extend() {
        let mut levels = banded();
        levels.remove(0);
        let cmap = LevelColorMap::new("t", "", "", levels).unwrap();
        assert_eq!(cmap.extend(), Extend::Max);
        assert_eq!(cmap.bin_edges(), &[0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_point_levels() {
        let levels = vec![
            Level::new(Some(1.0), Some(1.0), [1, 1, 1], "a"),
            Level::new(Some(2.0), Some(2.0), [2, 2, 2], "b"),
            Level::new(Some(3.0), Some(3.0), [3, 3, 3], "c"),
        ];
        let cmap = LevelColorMap::new("p", "", "", levels).unwrap();
        assert_eq!(cmap.bin_edges(), &[0.5, 1.5, 2.5, 3.5]);
        assert_eq!(cmap.bin_centers(), &[1.0, 2.0, 3.0]);
        assert_eq!(cmap.spacing(), TickSpacing::Uniform);
        assert_eq!(cmap.ticks(), &[1.0, 2.0, 3.0]);
        assert_eq!(cmap.tick_labels().unwrap(), &["a", "b", "c"]);
        assert_eq!(cmap.extend(), Extend::Neither);
    }

    #[test]
    fn test_default_and_single() {
        let default = LevelColorMap::new("", "", "", vec![]).unwrap();
        assert_eq!(default.name(), "my_cmap");
        assert_eq!(default.bin_edges().len(), 256);
        assert_eq!(default.bin_edges()[0], -1.0);
        assert_eq!(default.bin_edges()[255], 1.0);
        assert_eq!(default.extend(), Extend::Neither);

        let single = LevelColorMap::new(
            "s",
            "",
            "",
            vec![Level::new(Some(0.0), Some(5.0), [9, 8, 7], "only")],
        )
        .unwrap();
        assert_eq!(single.bin_edges(), &[0.0, 5.0]);
        assert_eq!(single.color_of(2.0), [9, 8, 7, 255]);
        assert_eq!(single.tick_labels().unwrap(), &["only"]);
    }

    #[test]
    fn test_invalid_tables() {
        // interior level with an open bound
        let levels = vec![
            Level::new(Some(0.0), Some(1.0), [0, 0, 0], ""),
            Level::new(Some(1.0), None, [0, 0, 0], ""),
            Level::new(Some(2.0), Some(3.0), [0, 0, 0], ""),
        ];
        assert!(LevelColorMap::new("bad", "", "", levels).is_err());

        // decreasing bands
        let levels = vec![
            Level::new(Some(5.0), Some(10.0), [0, 0, 0], ""),
            Level::new(Some(10.0), Some(1.0), [0, 0, 0], ""),
        ];
        assert!(LevelColorMap::new("bad", "", "", levels).is_err());

        // only open levels
        let levels = vec![
            Level::new(None, Some(0.0), [0, 0, 0], ""),
            Level::new(Some(0.0), None, [0, 0, 0], ""),
        ];
        assert!(matches!(
            LevelColorMap::new("bad", "", "", levels),
            Err(GplotError::Colormap { .. })
        ));
    }
}
