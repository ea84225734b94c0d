//! Concrete colormaps: continuous sampled ramps and discrete listed maps.

use super::colormap::{lerp_color, Colormap};

/// Continuous colormap stored as evenly spaced RGBA samples and linearly
/// interpolated between them.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledRamp {
    name: String,
    colors: Vec<[u8; 4]>,
}

impl SampledRamp {
    /// Build from RGBA samples. An empty sample list maps everything to
    /// opaque black.
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 4]>) -> Self {
        let colors = if colors.is_empty() {
            vec![[0, 0, 0, 255]]
        } else {
            colors
        };
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Build from opaque RGB anchors
    pub fn from_rgb(name: impl Into<String>, anchors: &[[u8; 3]]) -> Self {
        Self::new(
            name,
            anchors.iter().map(|c| [c[0], c[1], c[2], 255]).collect(),
        )
    }

    /// Sample a colorgrad gradient `n` times across its domain
    pub fn from_gradient(name: impl Into<String>, gradient: &colorgrad::Gradient, n: usize) -> Self {
        let (dmin, dmax) = gradient.domain();
        let n = n.max(2);
        let colors = (0..n)
            .map(|i| {
                let t = dmin + (dmax - dmin) * i as f64 / (n - 1) as f64;
                gradient.at(t).to_rgba8()
            })
            .collect();
        Self::new(name, colors)
    }

    /// The same ramp traversed backwards, named with an `_r` suffix
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        let mut colors = self.colors.clone();
        colors.reverse();
        Self { name, colors }
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

impl Colormap for SampledRamp {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let n = self.colors.len();
        if n == 1 || value.is_nan() {
            return self.colors[0];
        }
        let position = value.clamp(0.0, 1.0) * (n - 1) as f64;
        let index = position.floor() as usize;
        if index >= n - 1 {
            return self.colors[n - 1];
        }
        let t = position - index as f64;
        lerp_color(self.colors[index], self.colors[index + 1], t)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Discrete colormap: `[0, 1]` is split into one equal slot per color.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedColormap {
    name: String,
    colors: Vec<[u8; 4]>,
    under: Option<[u8; 4]>,
    over: Option<[u8; 4]>,
}

impl ListedColormap {
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 4]>) -> Self {
        let colors = if colors.is_empty() {
            vec![[0, 0, 0, 255]]
        } else {
            colors
        };
        Self {
            name: name.into(),
            colors,
            under: None,
            over: None,
        }
    }

    /// A map with a single color everywhere
    pub fn single(name: impl Into<String>, color: [u8; 4]) -> Self {
        Self::new(name, vec![color])
    }

    /// Set the colors used below 0 and above 1
    pub fn with_extremes(mut self, under: Option<[u8; 4]>, over: Option<[u8; 4]>) -> Self {
        self.under = under;
        self.over = over;
        self
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Colormap for ListedColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let n = self.colors.len();
        if value.is_nan() {
            return self.colors[0];
        }
        let index = (value.clamp(0.0, 1.0) * n as f64).floor() as usize;
        self.colors[index.min(n - 1)]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn under_color(&self) -> Option<[u8; 4]> {
        self.under
    }

    fn over_color(&self) -> Option<[u8; 4]> {
        self.over
    }
}
