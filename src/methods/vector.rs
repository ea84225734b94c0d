//! Vector plot methods: arrows and wind barbs.

use ndarray::{s, Array2};
use tracing::debug;

use crate::canvas::barbs::BarbIncrements;
use crate::error::{GplotError, Result};
use crate::levels::nice_key_length;

/// Two components on a shared rectilinear grid
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl VectorField {
    pub fn new(u: Array2<f64>, v: Array2<f64>, x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if u.dim() != v.dim() {
            return Err(GplotError::shape(format!(
                "Vector components differ in shape: {:?} vs {:?}",
                u.dim(),
                v.dim()
            )));
        }
        if u.dim() != (y.len(), x.len()) {
            return Err(GplotError::shape(format!(
                "Vector field of shape {:?} does not match {} y and {} x coordinates",
                u.dim(),
                y.len(),
                x.len()
            )));
        }
        Ok(Self { u, v, x, y })
    }

    /// Keep every `step`-th point along both axes
    pub fn subsample(&self, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(GplotError::config("Vector step must be positive"));
        }
        if step == 1 {
            return Ok(self.clone());
        }
        let stride = step as isize;
        Ok(Self {
            u: self.u.slice(s![..;stride, ..;stride]).to_owned(),
            v: self.v.slice(s![..;stride, ..;stride]).to_owned(),
            x: self.x.iter().step_by(step).copied().collect(),
            y: self.y.iter().step_by(step).copied().collect(),
        })
    }

    /// Resample both components linearly onto a uniform grid
    #[cfg(feature = "regrid")]
    pub fn regrid(&self, reso: f64) -> Result<Self> {
        use crate::interpolation::regrid::{regrid_to_reso, RegridMethod};

        let u = regrid_to_reso(self.u.view(), &self.x, &self.y, reso, RegridMethod::Linear)?;
        let v = regrid_to_reso(self.v.view(), &self.x, &self.y, reso, RegridMethod::Linear)?;
        Ok(Self {
            u: u.data,
            v: v.data,
            x: u.x,
            y: u.y,
        })
    }

    #[cfg(not(feature = "regrid"))]
    pub fn regrid(&self, _reso: f64) -> Result<Self> {
        Err(GplotError::CapabilityUnavailable {
            capability: "regrid".to_string(),
        })
    }

    /// Finite vector magnitudes
    pub fn magnitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.u
            .iter()
            .zip(self.v.iter())
            .map(|(u, v)| u.hypot(*v))
            .filter(|m| m.is_finite())
    }
}

/// Thinning applied before vectors are drawn
pub trait VectorSampling {
    fn step(&self) -> usize;

    fn reso(&self) -> Option<f64>;

    /// Regrid when a resolution is set, otherwise subsample by `step`
    fn sample(&self, field: &VectorField) -> Result<VectorField> {
        let sampled = match self.reso() {
            Some(reso) => field.regrid(reso)?,
            None => field.subsample(self.step())?,
        };
        debug!(
            step = self.step(),
            reso = ?self.reso(),
            nx = sampled.x.len(),
            ny = sampled.y.len(),
            "Sampled vector field"
        );
        Ok(sampled)
    }
}

/// Reference arrow drawn above the axes
#[derive(Debug, Clone, PartialEq)]
pub struct QuiverKey {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quiver {
    pub step: usize,
    pub reso: Option<f64>,
    pub scale: Option<f64>,
    /// Key arrow length; derived from the magnitudes when `None`
    pub keylength: Option<f64>,
    pub linewidth: f64,
    pub color: [u8; 4],
    pub alpha: f64,
}

impl Default for Quiver {
    fn default() -> Self {
        Self {
            step: 1,
            reso: None,
            scale: None,
            keylength: None,
            linewidth: 0.0015,
            color: [0, 0, 0, 255],
            alpha: 1.0,
        }
    }
}

impl VectorSampling for Quiver {
    fn step(&self) -> usize {
        self.step
    }

    fn reso(&self) -> Option<f64> {
        self.reso
    }
}

impl Quiver {
    pub fn validated(self) -> Result<Self> {
        check_sampling(self.step, self.reso)?;
        if let Some(scale) = self.scale.filter(|s| !(*s > 0.0)) {
            return Err(GplotError::config(format!(
                "Quiver scale must be positive, got {}",
                scale
            )));
        }
        Ok(self)
    }

    /// Key for a sampled field; `None` when no finite magnitude is positive
    pub fn key(&self, field: &VectorField, units: &str) -> Option<QuiverKey> {
        let length = self
            .keylength
            .or_else(|| nice_key_length(field.magnitudes()))?;
        Some(QuiverKey {
            x: 0.77,
            y: 1.05,
            length,
            label: format!("{:.2} {}", length, units).trim_end().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Barbs {
    pub step: usize,
    pub reso: Option<f64>,
    /// Barb length in points
    pub length: f64,
    pub increments: BarbIncrements,
    pub color: [u8; 4],
    pub alpha: f64,
}

impl Default for Barbs {
    fn default() -> Self {
        Self {
            step: 1,
            reso: None,
            length: 7.0,
            increments: BarbIncrements::default(),
            color: [0, 0, 0, 255],
            alpha: 1.0,
        }
    }
}

impl VectorSampling for Barbs {
    fn step(&self) -> usize {
        self.step
    }

    fn reso(&self) -> Option<f64> {
        self.reso
    }
}

impl Barbs {
    pub fn validated(self) -> Result<Self> {
        check_sampling(self.step, self.reso)?;
        if !(self.length > 0.0) {
            return Err(GplotError::config(format!(
                "Barb length must be positive, got {}",
                self.length
            )));
        }
        Ok(self)
    }
}

fn check_sampling(step: usize, reso: Option<f64>) -> Result<()> {
    if step == 0 {
        return Err(GplotError::config("Vector step must be positive"));
    }
    if let Some(reso) = reso.filter(|r| !(*r > 0.0)) {
        return Err(GplotError::config(format!(
            "Vector resolution must be positive, got {}",
            reso
        )));
    }
    if reso.is_some() && cfg!(not(feature = "regrid")) {
        return Err(GplotError::CapabilityUnavailable {
            capability: "regrid".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(ny: usize, nx: usize) -> VectorField {
        let x: Vec<f64> = (0..nx).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..ny).map(|i| i as f64).collect();
        let u = Array2::from_shape_fn((ny, nx), |(i, j)| (i + j) as f64);
        let v = Array2::from_elem((ny, nx), 1.0);
        VectorField::new(u, v, x, y).unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = VectorField::new(
            Array2::zeros((2, 3)),
            Array2::zeros((3, 2)),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0],
        );
        assert!(matches!(err, Err(GplotError::Shape { .. })));
    }

    #[test]
    fn test_step_subsamples_data_and_coords() {
        let quiver = Quiver {
            step: 2,
            ..Quiver::default()
        };
        let sampled = quiver.sample(&field(5, 7)).unwrap();
        assert_eq!(sampled.u.dim(), (3, 4));
        assert_eq!(sampled.x, vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(sampled.y, vec![0.0, 2.0, 4.0]);
        assert_eq!(sampled.u[[1, 1]], 4.0);
    }

    #[cfg(feature = "regrid")]
    #[test]
    fn test_reso_takes_priority_over_step() {
        let barbs = Barbs {
            step: 3,
            reso: Some(0.5),
            ..Barbs::default()
        };
        let sampled = barbs.sample(&field(3, 3)).unwrap();
        assert_eq!(sampled.x, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(sampled.u.dim(), (5, 5));
        assert!((sampled.u[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_key_length_from_magnitudes() {
        let quiver = Quiver::default();
        let f = VectorField::new(
            Array2::from_shape_fn((10, 10), |(i, j)| (i * 10 + j + 1) as f64 * 0.1),
            Array2::zeros((10, 10)),
            (0..10).map(f64::from).collect(),
            (0..10).map(f64::from).collect(),
        )
        .unwrap();
        let key = quiver.key(&f, "m/s").unwrap();
        assert_eq!(key.length, 8.0);
        assert_eq!(key.label, "8.00 m/s");
        assert_eq!((key.x, key.y), (0.77, 1.05));

        let fixed = Quiver {
            keylength: Some(5.0),
            ..Quiver::default()
        };
        assert_eq!(fixed.key(&f, "").unwrap().label, "5.00");
    }

    #[test]
    fn test_validation() {
        assert!(Quiver {
            step: 0,
            ..Quiver::default()
        }
        .validated()
        .is_err());
        assert!(Barbs {
            length: 0.0,
            ..Barbs::default()
        }
        .validated()
        .is_err());
        assert!(Barbs::default().validated().is_ok());
    }
}
