//! Plot method descriptors.
//!
//! A [`PlotMethod`] is built once from data and options and then reused
//! across draws. Scalar methods resolve their levels, colormap and norm
//! up front; vector methods carry their sampling and styling.

pub mod scalar;
pub mod vector;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GplotError, Result};
use crate::tables::LevelColorMap;

pub use scalar::{
    Boxfill, Gis, Hatch, Isofill, Isoline, Pcolor, ScaleInfo, ScaleOptions, Shading, Stroke,
};
pub use vector::{Barbs, Quiver, QuiverKey, VectorField, VectorSampling};

#[derive(Debug, Clone)]
pub enum PlotMethod {
    Isofill(Isofill),
    Isoline(Isoline),
    Boxfill(Boxfill),
    Pcolor(Pcolor),
    Hatch(Hatch),
    Shading(Shading),
    Quiver(Quiver),
    Barbs(Barbs),
    Gis(Gis),
}

impl PlotMethod {
    /// Filled contours with the bins and colors of a level table
    pub fn from_table(table: Arc<LevelColorMap>) -> Self {
        PlotMethod::Isofill(Isofill::from_table(table))
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            PlotMethod::Isofill(_) => MethodKind::Isofill,
            PlotMethod::Isoline(_) => MethodKind::Isoline,
            PlotMethod::Boxfill(_) => MethodKind::Boxfill,
            PlotMethod::Pcolor(_) => MethodKind::Pcolor,
            PlotMethod::Hatch(_) => MethodKind::Hatch,
            PlotMethod::Shading(_) => MethodKind::Shading,
            PlotMethod::Quiver(_) => MethodKind::Quiver,
            PlotMethod::Barbs(_) => MethodKind::Barbs,
            PlotMethod::Gis(_) => MethodKind::Gis,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Isofill and isoline: discrete levels and staggered colorbar ticks
    pub fn is_contour(&self) -> bool {
        matches!(self, PlotMethod::Isofill(_) | PlotMethod::Isoline(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, PlotMethod::Quiver(_) | PlotMethod::Barbs(_))
    }

    /// Only value-mapped methods get a colorbar
    pub fn has_colorbar(&self) -> bool {
        self.scale().is_some()
    }

    pub fn scale(&self) -> Option<&ScaleInfo> {
        match self {
            PlotMethod::Isofill(m) => Some(&m.scale),
            PlotMethod::Isoline(m) => Some(&m.scale),
            PlotMethod::Boxfill(m) => Some(&m.scale),
            PlotMethod::Pcolor(m) => Some(&m.scale),
            _ => None,
        }
    }

    /// Check the parameters that are not resolved at construction.
    /// Vector methods validate their sampling and styling here.
    pub fn validated(self) -> Result<Self> {
        match self {
            PlotMethod::Quiver(q) => q.validated().map(PlotMethod::Quiver),
            PlotMethod::Barbs(b) => b.validated().map(PlotMethod::Barbs),
            other => Ok(other),
        }
    }

    /// Sampling of the vector methods
    pub fn sampling(&self) -> Option<&dyn VectorSampling> {
        match self {
            PlotMethod::Quiver(q) => Some(q),
            PlotMethod::Barbs(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Isofill> for PlotMethod {
    fn from(m: Isofill) -> Self {
        PlotMethod::Isofill(m)
    }
}

impl From<Isoline> for PlotMethod {
    fn from(m: Isoline) -> Self {
        PlotMethod::Isoline(m)
    }
}

impl From<Boxfill> for PlotMethod {
    fn from(m: Boxfill) -> Self {
        PlotMethod::Boxfill(m)
    }
}

impl From<Pcolor> for PlotMethod {
    fn from(m: Pcolor) -> Self {
        PlotMethod::Pcolor(m)
    }
}

impl From<Quiver> for PlotMethod {
    fn from(m: Quiver) -> Self {
        PlotMethod::Quiver(m)
    }
}

impl From<Barbs> for PlotMethod {
    fn from(m: Barbs) -> Self {
        PlotMethod::Barbs(m)
    }
}

/// Method tag without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Isofill,
    Isoline,
    Boxfill,
    Pcolor,
    Hatch,
    Shading,
    Quiver,
    Barbs,
    Gis,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Isofill => "isofill",
            MethodKind::Isoline => "isoline",
            MethodKind::Boxfill => "boxfill",
            MethodKind::Pcolor => "pcolor",
            MethodKind::Hatch => "hatch",
            MethodKind::Shading => "shading",
            MethodKind::Quiver => "quiver",
            MethodKind::Barbs => "barbs",
            MethodKind::Gis => "gis",
        }
    }
}

impl FromStr for MethodKind {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "isofill" | "contourf" => Ok(MethodKind::Isofill),
            "isoline" | "contour" => Ok(MethodKind::Isoline),
            "boxfill" | "imshow" => Ok(MethodKind::Boxfill),
            "pcolor" | "pcolormesh" => Ok(MethodKind::Pcolor),
            "hatch" => Ok(MethodKind::Hatch),
            "shading" => Ok(MethodKind::Shading),
            "quiver" => Ok(MethodKind::Quiver),
            "barbs" => Ok(MethodKind::Barbs),
            "gis" => Ok(MethodKind::Gis),
            _ => Err(GplotError::invalid(
                "method",
                format!("Unknown plot method: {}", s),
            )),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_capabilities() {
        let data = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64);
        let fill: PlotMethod = Isofill::new(&[data.view().into_dyn()], &ScaleOptions::default())
            .unwrap()
            .into();
        assert!(fill.is_contour() && fill.has_colorbar());
        assert_eq!(fill.name(), "isofill");

        let quiver: PlotMethod = Quiver::default().into();
        assert!(quiver.is_vector() && !quiver.has_colorbar());
        assert_eq!(quiver.sampling().map(|s| s.step()), Some(1));

        assert!(!PlotMethod::Hatch(Hatch::default()).has_colorbar());
        assert!(!PlotMethod::Gis(Gis::default()).is_contour());
    }

    #[test]
    fn test_method_kind_parsing() {
        assert_eq!("contourf".parse::<MethodKind>().unwrap(), MethodKind::Isofill);
        assert_eq!("Barbs".parse::<MethodKind>().unwrap(), MethodKind::Barbs);
        assert!("surface".parse::<MethodKind>().is_err());
        assert_eq!(MethodKind::Pcolor.to_string(), "pcolor");
    }

    #[test]
    fn test_from_table() {
        let method = PlotMethod::from_table(crate::tables::get("rh").unwrap());
        let scale = method.scale().unwrap();
        assert_eq!(scale.levels, crate::tables::get("rh").unwrap().bin_edges());
    }
}
