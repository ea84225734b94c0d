//! Wind barb increments and glyph geometry.
//!
//! A barb is built from filled flags, hollow flags, full barbs and an
//! optional half barb. The thresholds are a strategy value handed to the
//! barbs artist, so the CMA convention (hollow flag at 20, filled flag at
//! 50) and the conventional one (flag at 50) coexist.

use serde::{Deserialize, Serialize};

/// Magnitude thresholds of the barb pieces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarbIncrements {
    pub half: f64,
    pub full: f64,
    pub flag: f64,
    /// Filled flag tier above the hollow flag
    pub full_flag: Option<f64>,
}

impl BarbIncrements {
    /// Conventional 5 / 10 / 50 increments
    pub fn standard() -> Self {
        Self {
            half: 5.0,
            full: 10.0,
            flag: 50.0,
            full_flag: None,
        }
    }

    /// CMA increments: 2 / 4 / hollow 20 / filled 50
    pub fn cma() -> Self {
        Self {
            half: 2.0,
            full: 4.0,
            flag: 20.0,
            full_flag: Some(50.0),
        }
    }
}

impl Default for BarbIncrements {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pieces needed for one magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarbTail {
    pub full_flags: u32,
    pub flags: u32,
    pub barbs: u32,
    pub half: bool,
    /// Nothing to draw but the calm marker
    pub empty: bool,
}

fn divmod(value: f64, step: f64) -> (f64, f64) {
    let d = (value / step).floor();
    (d, value - d * step)
}

/// Count barb pieces for each magnitude; with `rounding` the magnitude is
/// first rounded to the nearest half increment.
pub fn find_tails(magnitudes: &[f64], increments: &BarbIncrements, rounding: bool) -> Vec<BarbTail> {
    magnitudes
        .iter()
        .map(|&m| {
            let mut mag = if rounding {
                increments.half * (m / increments.half).round()
            } else {
                m
            };
            let mut full_flags = 0.0;
            if let Some(step) = increments.full_flag {
                let (n, rest) = divmod(mag, step);
                full_flags = n;
                mag = rest;
            }
            let (flags, rest) = divmod(mag, increments.flag);
            let (barbs, rest) = divmod(rest, increments.full);
            let half = rest >= increments.half;
            BarbTail {
                full_flags: full_flags as u32,
                flags: flags as u32,
                barbs: barbs as u32,
                half,
                empty: !(half || flags > 0.0 || barbs > 0.0 || full_flags > 0.0),
            }
        })
        .collect()
}

/// Glyph of one barb in pixel space: open polylines plus closed flag
/// triangles and whether each triangle is filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarbGlyph {
    pub lines: Vec<Vec<(f64, f64)>>,
    pub flags: Vec<([(f64, f64); 3], bool)>,
}

/// Build the glyph of a barb at pixel `(px, py)` pointing into the
/// direction the wind comes from.
pub fn barb_glyph(px: f64, py: f64, u: f64, v: f64, length: f64, tail: &BarbTail) -> BarbGlyph {
    let mut glyph = BarbGlyph::default();
    let mag = u.hypot(v);
    if tail.empty || mag == 0.0 {
        let r = length * 0.1;
        let circle = (0..=12)
            .map(|k| {
                let a = k as f64 * std::f64::consts::TAU / 12.0;
                (px + r * a.cos(), py + r * a.sin())
            })
            .collect();
        glyph.lines.push(circle);
        return glyph;
    }

    // unit vector along the shaft, from the station upwind; pixel y points down
    let (dx, dy) = (-u / mag, v / mag);
    // barbs and flags sit on the left of the shaft
    let (nx, ny) = (dy, -dx);
    let tip = (px + dx * length, py + dy * length);
    glyph.lines.push(vec![(px, py), tip]);

    let spacing = length * 0.15;
    let height = length * 0.4;
    let flag_width = length * 0.25;
    let mut offset = 0.0;
    let point_at = |d: f64| (px + dx * (length - d), py + dy * (length - d));

    let tiers = [(tail.full_flags, true), (tail.flags, false)];
    for (count, filled) in tiers {
        for _ in 0..count {
            let base0 = point_at(offset);
            let base1 = point_at(offset + flag_width);
            let apex = (base0.0 + nx * height, base0.1 + ny * height);
            glyph.flags.push(([base0, apex, base1], filled));
            offset += flag_width + spacing * 0.5;
        }
    }
    for _ in 0..tail.barbs {
        let base = point_at(offset);
        glyph
            .lines
            .push(vec![base, (base.0 + nx * height + dx * spacing, base.1 + ny * height + dy * spacing)]);
        offset += spacing;
    }
    if tail.half {
        if offset == 0.0 {
            offset = spacing;
        }
        let base = point_at(offset);
        let h = height * 0.5;
        glyph.lines.push(vec![
            base,
            (base.0 + nx * h + dx * spacing * 0.5, base.1 + ny * h + dy * spacing * 0.5),
        ]);
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_tails() {
        let tails = find_tails(&[0.0, 5.0, 15.0, 65.0], &BarbIncrements::standard(), true);
        assert!(tails[0].empty);
        assert_eq!((tails[1].barbs, tails[1].half), (0, true));
        assert_eq!((tails[2].barbs, tails[2].half), (1, true));
        assert_eq!((tails[3].flags, tails[3].barbs, tails[3].half), (1, 1, true));
        assert_eq!(tails[3].full_flags, 0);
    }

    #[test]
    fn test_cma_tails_split_flags() {
        let tails = find_tails(&[74.0, 22.9], &BarbIncrements::cma(), true);
        // 74 = 50 + 20 + 4
        assert_eq!(
            tails[0],
            BarbTail {
                full_flags: 1,
                flags: 1,
                barbs: 1,
                half: false,
                empty: false
            }
        );
        // 22.9 rounds to 22 = 20 + 2
        assert_eq!((tails[1].flags, tails[1].barbs, tails[1].half), (1, 0, true));
    }

    #[test]
    fn test_truncation_without_rounding() {
        let tails = find_tails(&[4.9], &BarbIncrements::standard(), false);
        assert!(tails[0].empty);
    }

    #[test]
    fn test_glyph_pieces() {
        let tail = find_tails(&[74.0], &BarbIncrements::cma(), true)[0];
        let glyph = barb_glyph(50.0, 50.0, 10.0, 0.0, 20.0, &tail);
        assert_eq!(glyph.flags.len(), 2);
        assert!(glyph.flags[0].1 && !glyph.flags[1].1);
        // shaft plus one barb
        assert_eq!(glyph.lines.len(), 2);

        let calm = barb_glyph(0.0, 0.0, 0.0, 0.0, 20.0, &BarbTail { empty: true, ..BarbTail::default() });
        assert!(calm.flags.is_empty());
        assert_eq!(calm.lines[0].len(), 13);
    }
}
