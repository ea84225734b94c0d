//! Axis tick location and formatting.
//!
//! The locator picks the largest step from a staircase of round multiples
//! that still yields at least two ticks inside the range.

/// Default round step multiples for axis ticks
pub const AXIS_STEPS: [f64; 12] = [1.0, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 8.5, 9.0, 10.0];

const EDGE_TOLERANCE: f64 = 1e-10;

/// Locator choosing at most `nbins` intervals with steps from `steps`
#[derive(Debug, Clone, PartialEq)]
pub struct MaxNLocator {
    pub nbins: usize,
    pub steps: Vec<f64>,
    pub min_n_ticks: usize,
}

impl Default for MaxNLocator {
    fn default() -> Self {
        Self {
            nbins: 9,
            steps: AXIS_STEPS.to_vec(),
            min_n_ticks: 2,
        }
    }
}

fn closeto(ms: f64, edge: f64) -> bool {
    (ms - edge).abs() < EDGE_TOLERANCE
}

/// Python-style float divmod
fn divmod(x: f64, step: f64) -> (f64, f64) {
    let d = (x / step).floor();
    (d, x - d * step)
}

impl MaxNLocator {
    pub fn new(nbins: usize) -> Self {
        Self {
            nbins: nbins.max(1),
            ..Self::default()
        }
    }

    /// Steps extended one decade down and one step up, scaled to the range
    fn staircase(&self, scale: f64) -> Vec<f64> {
        let n = self.steps.len();
        let mut out: Vec<f64> = self.steps[..n.saturating_sub(1)]
            .iter()
            .map(|s| 0.1 * s)
            .collect();
        out.extend_from_slice(&self.steps);
        if n > 1 {
            out.push(10.0 * self.steps[1]);
        }
        out.into_iter().map(|s| s * scale).collect()
    }

    /// Candidate tick values covering `[vmin, vmax]`, possibly one step
    /// beyond each end.
    pub fn tick_values(&self, vmin: f64, vmax: f64) -> Vec<f64> {
        let (vmin, vmax) = if vmin <= vmax { (vmin, vmax) } else { (vmax, vmin) };
        if !(vmin.is_finite() && vmax.is_finite()) {
            return Vec::new();
        }
        if vmin == vmax {
            return vec![vmin];
        }
        let nbins = self.nbins as f64;
        let scale = 10f64.powf(((vmax - vmin) / nbins).log10().floor());
        let steps = self.staircase(scale);
        let raw_step = (vmax - vmin) / nbins;
        let istep = steps
            .iter()
            .position(|&s| s >= raw_step)
            .unwrap_or(steps.len() - 1);

        let mut ticks = Vec::new();
        for &step in steps[..=istep].iter().rev() {
            let best_vmin = (vmin / step).floor() * step;
            let (d, m) = divmod(vmin - best_vmin, step);
            let low = if closeto(m / step, 1.0) { d + 1.0 } else { d };
            let (d, m) = divmod(vmax - best_vmin, step);
            let high = if closeto(m / step, 0.0) { d } else { d + 1.0 };

            ticks = ((low as i64)..=(high as i64))
                .map(|k| k as f64 * step + best_vmin)
                .collect();
            let inside = ticks.iter().filter(|&&t| t >= vmin && t <= vmax).count();
            if inside >= self.min_n_ticks {
                break;
            }
        }
        ticks
    }
}

/// Ticks for a coordinate axis, restricted to the coordinate range
pub fn axis_ticks(coords: &[f64], locator: &MaxNLocator) -> Vec<f64> {
    let (lo, hi) = coords
        .iter()
        .filter(|c| c.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    if lo > hi {
        return Vec::new();
    }
    ticks_within(lo, hi, locator)
}

/// Locator ticks filtered to `[lo, hi]` with a relative tolerance
pub fn ticks_within(lo: f64, hi: f64, locator: &MaxNLocator) -> Vec<f64> {
    let eps = (hi - lo).abs() * 1e-9;
    locator
        .tick_values(lo, hi)
        .into_iter()
        .filter(|&t| t >= lo - eps && t <= hi + eps)
        .collect()
}

fn decimals_needed(values: &[f64]) -> usize {
    (0..=10)
        .find(|&d| {
            let s = 10f64.powi(d as i32);
            values
                .iter()
                .all(|v| ((v * s).round() / s - v).abs() <= 1e-9 * v.abs().max(1.0))
        })
        .unwrap_or(10)
}

fn format_fixed(value: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, value);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Fixed-point labels with the fewest decimals that represent every tick;
/// integral ticks print without a fractional part.
pub fn format_ticks(values: &[f64]) -> Vec<String> {
    let decimals = decimals_needed(values);
    values.iter().map(|&v| format_fixed(v, decimals)).collect()
}

fn format_degrees(value: f64) -> String {
    format_fixed(value, decimals_needed(&[value]))
}

/// `120°E`, `60°W`, `0°`, `180°`
pub fn format_longitude(lon: f64) -> String {
    let lon = crate::backend::geo::wrap_longitude(lon);
    if lon.abs() < 1e-9 || (lon.abs() - 180.0).abs() < 1e-9 {
        format!("{}°", format_degrees(lon.abs()))
    } else if lon > 0.0 {
        format!("{}°E", format_degrees(lon))
    } else {
        format!("{}°W", format_degrees(-lon))
    }
}

/// `30°N`, `45°S`, `0°`
pub fn format_latitude(lat: f64) -> String {
    if lat.abs() < 1e-9 {
        "0°".to_string()
    } else if lat > 0.0 {
        format!("{}°N", format_degrees(lat))
    } else {
        format!("{}°S", format_degrees(-lat))
    }
}
