//! Subplot geometry and the shared-axis label policy.
//!
//! In a grid of panels only the outer edges carry tick labels: the first
//! column labels its left side, the last column its right side and the
//! last row its bottom side.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GplotError, Result};

/// Position of one panel in an `nrows x ncols` grid (1-based, row-major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubplotGeometry {
    pub nrows: usize,
    pub ncols: usize,
    pub index: usize,
}

impl SubplotGeometry {
    pub fn new(nrows: usize, ncols: usize, index: usize) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(GplotError::invalid(
                "geometry",
                format!("Grid must have at least one row and column, got {}x{}", nrows, ncols),
            ));
        }
        if index == 0 || index > nrows * ncols {
            return Err(GplotError::invalid(
                "geometry",
                format!(
                    "Subplot index {} outside 1..={} for a {}x{} grid",
                    index,
                    nrows * ncols,
                    nrows,
                    ncols
                ),
            ));
        }
        Ok(Self {
            nrows,
            ncols,
            index,
        })
    }

    /// A standalone single-panel figure
    pub fn single() -> Self {
        Self {
            nrows: 1,
            ncols: 1,
            index: 1,
        }
    }

    pub fn is_single(&self) -> bool {
        self.nrows * self.ncols == 1
    }

    /// Zero-based `(row, col)`
    pub fn position(&self) -> (usize, usize) {
        let linear = self.index - 1;
        (linear / self.ncols, linear % self.ncols)
    }

    pub fn max_dim(&self) -> usize {
        self.nrows.max(self.ncols)
    }
}

impl Default for SubplotGeometry {
    fn default() -> Self {
        Self::single()
    }
}

/// Which sides of an axis carry tick labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideFlags {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl SideFlags {
    pub const NONE: SideFlags = SideFlags {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    pub fn new(left: bool, right: bool, top: bool, bottom: bool) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// Label sides for the value (y / parallels) and category (x / meridians) axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLabels {
    pub value: SideFlags,
    pub category: SideFlags,
}

impl AxisLabels {
    pub const NONE: AxisLabels = AxisLabels {
        value: SideFlags::NONE,
        category: SideFlags::NONE,
    };
}

/// Decide which sides of a panel are labeled under the shared-axis layout.
pub fn labels_for_position(geometry: &SubplotGeometry) -> AxisLabels {
    if geometry.is_single() {
        return AxisLabels {
            value: SideFlags::new(true, true, false, false),
            category: SideFlags::new(false, false, false, true),
        };
    }

    let (row, col) = geometry.position();
    let mut value = SideFlags::NONE;
    if col == 0 {
        value.left = true;
        if geometry.ncols == 1 {
            value.right = true;
        }
    } else if col == geometry.ncols - 1 {
        value.right = true;
    }

    let mut category = SideFlags::NONE;
    if (row == 0 && geometry.nrows == 1) || row == geometry.nrows - 1 {
        category.bottom = true;
    }

    AxisLabels { value, category }
}

/// Caller's axis-labeling choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAxes {
    /// Position-aware labels
    #[default]
    Auto,
    /// No tick labels
    Off,
    /// Every side of both axes
    All,
    Explicit(AxisLabels),
}

impl LabelAxes {
    pub fn resolve(&self, geometry: &SubplotGeometry) -> AxisLabels {
        match self {
            LabelAxes::Auto => labels_for_position(geometry),
            LabelAxes::Off => AxisLabels::NONE,
            LabelAxes::All => AxisLabels {
                value: SideFlags::new(true, true, false, false),
                category: SideFlags::new(false, false, true, true),
            },
            LabelAxes::Explicit(labels) => *labels,
        }
    }
}

impl std::str::FromStr for LabelAxes {
    type Err = GplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" | "true" => Ok(LabelAxes::Auto),
            "off" | "false" => Ok(LabelAxes::Off),
            "all" => Ok(LabelAxes::All),
            _ => Err(GplotError::config(format!(
                "Invalid label_axes: {} (expected auto, off or all)",
                s
            ))),
        }
    }
}

/// Alphabetic panel index: 1 -> "(a)", 26 -> "(z)", 27 -> "(aa)", 52 -> "(zz)".
pub fn index_to_letter(index: usize) -> Result<String> {
    if index == 0 {
        return Err(GplotError::invalid("index", "Panel index must be at least 1"));
    }
    let letter = char::from(b'a' + ((index - 1) % 26) as u8);
    let repeat = (index - 1) / 26 + 1;
    Ok(format!("({})", letter.to_string().repeat(repeat)))
}

/// Panel title after automatic indexing.
///
/// `"none"` suppresses the title. On multi-panel figures a missing title
/// becomes the panel letter, a title already starting with `(x)` keeps its
/// own index and any other title is prefixed with the letter.
pub fn panel_title(title: Option<&str>, geometry: &SubplotGeometry) -> Result<Option<String>> {
    if title == Some("none") {
        return Ok(None);
    }
    if geometry.is_single() {
        return Ok(title.map(str::to_string));
    }
    let letter = index_to_letter(geometry.index)?;
    let Some(title) = title else {
        return Ok(Some(letter));
    };
    let indexed = Regex::new(r"^\((.*?)\)(.*)")?;
    let formatted = match indexed.captures(title) {
        Some(caps) => format!("({}) {}", &caps[1], caps[2].trim()),
        None => format!("{} {}", letter, title),
    };
    Ok(Some(formatted))
}

/// Font size grows for dense grids: `base + 7 / max(nrows, ncols)`
pub fn effective_fontsize(base: f64, geometry: &SubplotGeometry) -> f64 {
    base + 7.0 / geometry.max_dim() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn geo(nrows: usize, ncols: usize, index: usize) -> SubplotGeometry {
        SubplotGeometry::new(nrows, ncols, index).unwrap()
    }

    #[test]
    fn test_single_panel_labels() {
        let labels = labels_for_position(&geo(1, 1, 1));
        assert!(labels.value.left && labels.value.right);
        assert!(!labels.value.top && !labels.value.bottom);
        assert_eq!(labels.category, SideFlags::new(false, false, false, true));
    }

    #[test]
    fn test_single_row_labels() {
        let first = labels_for_position(&geo(1, 3, 1));
        let middle = labels_for_position(&geo(1, 3, 2));
        let last = labels_for_position(&geo(1, 3, 3));
        assert_eq!(first.value, SideFlags::new(true, false, false, false));
        assert_eq!(middle.value, SideFlags::NONE);
        assert_eq!(last.value, SideFlags::new(false, true, false, false));
        for labels in [first, middle, last] {
            assert!(labels.category.bottom);
            assert!(!labels.category.top);
        }
    }

    #[test]
    fn test_grid_labels() {
        // 2x2: only the bottom row labels its bottom side
        assert!(!labels_for_position(&geo(2, 2, 1)).category.bottom);
        assert!(labels_for_position(&geo(2, 2, 3)).category.bottom);
        assert!(labels_for_position(&geo(2, 2, 4)).value.right);

        // single column labels both sides
        let labels = labels_for_position(&geo(3, 1, 2));
        assert!(labels.value.left && labels.value.right);
        assert!(!labels.category.bottom);
    }

    #[test]
    fn test_label_axes_resolve() {
        let g = geo(2, 2, 2);
        assert_eq!(LabelAxes::Off.resolve(&g), AxisLabels::NONE);
        let all = LabelAxes::All.resolve(&g);
        assert!(all.value.left && all.value.right && all.category.top && all.category.bottom);
        let explicit = AxisLabels {
            value: SideFlags::new(false, false, true, false),
            category: SideFlags::NONE,
        };
        assert_eq!(LabelAxes::Explicit(explicit).resolve(&g), explicit);
    }

    #[test]
    fn test_index_to_letter() {
        assert_eq!(index_to_letter(1).unwrap(), "(a)");
        assert_eq!(index_to_letter(26).unwrap(), "(z)");
        assert_eq!(index_to_letter(27).unwrap(), "(aa)");
        assert_eq!(index_to_letter(52).unwrap(), "(zz)");
        assert!(index_to_letter(0).is_err());
    }

    #[test]
    fn test_panel_title() {
        let multi = geo(2, 2, 3);
        assert_eq!(panel_title(None, &multi).unwrap().as_deref(), Some("(c)"));
        assert_eq!(
            panel_title(Some("SLP"), &multi).unwrap().as_deref(),
            Some("(c) SLP")
        );
        assert_eq!(
            panel_title(Some("(x)   own index"), &multi).unwrap().as_deref(),
            Some("(x) own index")
        );
        assert_eq!(panel_title(Some("none"), &multi).unwrap(), None);

        let single = SubplotGeometry::single();
        assert_eq!(panel_title(None, &single).unwrap(), None);
        assert_eq!(panel_title(Some("SLP"), &single).unwrap().as_deref(), Some("SLP"));
    }

    #[test]
    fn test_geometry_validation() {
        assert!(SubplotGeometry::new(0, 2, 1).is_err());
        assert!(SubplotGeometry::new(2, 2, 5).is_err());
        assert!(SubplotGeometry::new(2, 2, 0).is_err());
        assert_eq!(geo(2, 3, 5).position(), (1, 1));
        assert_eq!(effective_fontsize(8.0, &geo(2, 3, 1)), 8.0 + 7.0 / 3.0);
    }
}
