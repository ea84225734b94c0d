//! Value normalizations mapping data values onto colormap coordinates.

use crate::error::{GplotError, Result};

/// Plain linear mapping of `[vmin, vmax]` onto `[0, 1]` (unclamped)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LinearNorm {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if self.vmax > self.vmin {
            (value - self.vmin) / (self.vmax - self.vmin)
        } else {
            0.0
        }
    }
}

/// Piecewise-linear normalization through a center value:
/// `vmin -> 0`, `vcenter -> 0.5`, `vmax -> 1`, clamped outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSlopeNorm {
    vmin: f64,
    vcenter: f64,
    vmax: f64,
}

impl TwoSlopeNorm {
    /// Requires `vmin <= vcenter <= vmax` and `vmin < vmax`.
    pub fn new(vmin: f64, vcenter: f64, vmax: f64) -> Result<Self> {
        if !(vmin.is_finite() && vcenter.is_finite() && vmax.is_finite()) {
            return Err(GplotError::precondition(format!(
                "TwoSlopeNorm bounds must be finite, got vmin={}, vcenter={}, vmax={}",
                vmin, vcenter, vmax
            )));
        }
        if vmin > vcenter || vcenter > vmax || vmin >= vmax {
            return Err(GplotError::precondition(format!(
                "TwoSlopeNorm requires vmin <= vcenter <= vmax with vmin < vmax, got vmin={}, vcenter={}, vmax={}",
                vmin, vcenter, vmax
            )));
        }
        Ok(Self {
            vmin,
            vcenter,
            vmax,
        })
    }

    /// Autoscale the bounds from the finite values, clipped at `vcenter`
    pub fn autoscaled<I>(vcenter: f64, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            return Err(GplotError::precondition(
                "TwoSlopeNorm cannot autoscale without finite data",
            ));
        }
        Self::new(lo.min(vcenter), vcenter, hi.max(vcenter))
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vcenter(&self) -> f64 {
        self.vcenter
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        if value < self.vcenter {
            if self.vcenter > self.vmin {
                (0.5 * (value - self.vmin) / (self.vcenter - self.vmin)).clamp(0.0, 0.5)
            } else {
                0.0
            }
        } else if value > self.vcenter {
            if self.vmax > self.vcenter {
                (0.5 + 0.5 * (value - self.vcenter) / (self.vmax - self.vcenter)).clamp(0.5, 1.0)
            } else {
                1.0
            }
        } else {
            0.5
        }
    }
}

/// Where a value falls relative to a set of boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    Under,
    Bin(usize),
    Over,
}

/// Discrete normalization: each interval between consecutive boundaries
/// gets one colormap slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryNorm {
    boundaries: Vec<f64>,
}

impl BoundaryNorm {
    /// Boundaries must be at least two and non-decreasing
    pub fn new(boundaries: Vec<f64>) -> Result<Self> {
        if boundaries.len() < 2 {
            return Err(GplotError::invalid(
                "boundaries",
                format!("BoundaryNorm needs at least 2 boundaries, got {}", boundaries.len()),
            ));
        }
        if boundaries.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(GplotError::invalid(
                "boundaries",
                format!("Boundaries must be non-decreasing: {:?}", boundaries),
            ));
        }
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of bins (one fewer than the boundaries)
    pub fn ncolors(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn vmin(&self) -> f64 {
        self.boundaries[0]
    }

    pub fn vmax(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Values at or past the last boundary are `Over`
    pub fn bin(&self, value: f64) -> BinIndex {
        if value < self.vmin() {
            return BinIndex::Under;
        }
        if value >= self.vmax() {
            return BinIndex::Over;
        }
        let upper = self.boundaries.partition_point(|&b| b <= value);
        BinIndex::Bin(upper.saturating_sub(1).min(self.ncolors() - 1))
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        match self.bin(value) {
            BinIndex::Under => -1.0,
            BinIndex::Over => 2.0,
            BinIndex::Bin(i) => (i as f64 + 0.5) / self.ncolors() as f64,
        }
    }
}

/// Any normalization a method can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Norm {
    Linear(LinearNorm),
    TwoSlope(TwoSlopeNorm),
    Boundary(BoundaryNorm),
}

impl Norm {
    pub fn normalize(&self, value: f64) -> f64 {
        match self {
            Norm::Linear(n) => n.normalize(value),
            Norm::TwoSlope(n) => n.normalize(value),
            Norm::Boundary(n) => n.normalize(value),
        }
    }

    pub fn vmin(&self) -> f64 {
        match self {
            Norm::Linear(n) => n.vmin,
            Norm::TwoSlope(n) => n.vmin(),
            Norm::Boundary(n) => n.vmin(),
        }
    }

    pub fn vmax(&self) -> f64 {
        match self {
            Norm::Linear(n) => n.vmax,
            Norm::TwoSlope(n) => n.vmax(),
            Norm::Boundary(n) => n.vmax(),
        }
    }
}

impl From<LinearNorm> for Norm {
    fn from(n: LinearNorm) -> Self {
        Norm::Linear(n)
    }
}

impl From<TwoSlopeNorm> for Norm {
    fn from(n: TwoSlopeNorm) -> Self {
        Norm::TwoSlope(n)
    }
}

impl From<BoundaryNorm> for Norm {
    fn from(n: BoundaryNorm) -> Self {
        Norm::Boundary(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_slope_boundary_law() {
        for &(vmin, vc, vmax) in &[(-10.0, 0.0, 30.0), (1.0, 2.0, 100.0), (-5.0, -4.0, -1.0)] {
            let norm = TwoSlopeNorm::new(vmin, vc, vmax).unwrap();
            assert_eq!(norm.normalize(vmin), 0.0);
            assert_eq!(norm.normalize(vc), 0.5);
            assert_eq!(norm.normalize(vmax), 1.0);
            let samples: Vec<f64> = (0..=50)
                .map(|i| norm.normalize(vmin + (vmax - vmin) * i as f64 / 50.0))
                .collect();
            assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_two_slope_clamps_outside() {
        let norm = TwoSlopeNorm::new(-1.0, 0.0, 4.0).unwrap();
        assert_eq!(norm.normalize(-100.0), 0.0);
        assert_eq!(norm.normalize(100.0), 1.0);
        assert_eq!(norm.normalize(2.0), 0.75);
    }

    #[test]
    fn test_two_slope_precondition() {
        assert!(matches!(
            TwoSlopeNorm::new(0.0, 5.0, 4.0),
            Err(GplotError::Precondition { .. })
        ));
        assert!(TwoSlopeNorm::new(1.0, 0.0, 4.0).is_err());
        assert!(TwoSlopeNorm::new(0.0, 0.0, 0.0).is_err());
        assert!(TwoSlopeNorm::new(0.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_two_slope_autoscale_clips_at_center() {
        let norm = TwoSlopeNorm::autoscaled(0.0, vec![2.0, 5.0, f64::NAN]).unwrap();
        assert_eq!(norm.vmin(), 0.0);
        assert_eq!(norm.vmax(), 5.0);
        assert!(TwoSlopeNorm::autoscaled(0.0, vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_boundary_bins() {
        let norm = BoundaryNorm::new(vec![0.0, 1.0, 2.0, 4.0]).unwrap();
        assert_eq!(norm.ncolors(), 3);
        assert_eq!(norm.bin(-0.1), BinIndex::Under);
        assert_eq!(norm.bin(0.0), BinIndex::Bin(0));
        assert_eq!(norm.bin(1.0), BinIndex::Bin(1));
        assert_eq!(norm.bin(3.9), BinIndex::Bin(2));
        assert_eq!(norm.bin(4.0), BinIndex::Over);
        assert_eq!(norm.normalize(1.5), 0.5);
        assert!(BoundaryNorm::new(vec![1.0]).is_err());
        assert!(BoundaryNorm::new(vec![2.0, 1.0]).is_err());
    }
}
