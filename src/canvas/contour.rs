//! Contour line extraction using marching squares.
//!
//! Cells are visited on the index grid; crossings are interpolated along
//! cell edges and mapped back to data coordinates through the axis
//! coordinate arrays.

use ndarray::ArrayView2;

/// A line segment in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Coordinate at a fractional index of a monotonic axis
fn coord_at(coords: &[f64], index: f64) -> f64 {
    let last = coords.len().saturating_sub(1);
    let i0 = (index.floor().max(0.0) as usize).min(last);
    let i1 = (i0 + 1).min(last);
    let frac = index - i0 as f64;
    coords[i0] + (coords[i1] - coords[i0]) * frac
}

/// Marching squares over `z` (rows along `y`, columns along `x`).
///
/// Cells touching a NaN are skipped.
pub fn march_squares(x: &[f64], y: &[f64], z: ArrayView2<'_, f64>, level: f64) -> Vec<Segment> {
    let (nrows, ncols) = z.dim();
    if nrows < 2 || ncols < 2 || x.len() != ncols || y.len() != nrows {
        return Vec::new();
    }

    let to_data = |(i, j): (f64, f64)| (coord_at(x, j), coord_at(y, i));

    let mut segments = Vec::new();
    for i in 0..nrows - 1 {
        for j in 0..ncols - 1 {
            let tl = z[[i, j]];
            let tr = z[[i, j + 1]];
            let bl = z[[i + 1, j]];
            let br = z[[i + 1, j + 1]];
            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }

            let (fi, fj) = (i as f64, j as f64);
            let top = interpolate_edge((fi, fj), (fi, fj + 1.0), tl, tr, level);
            let right = interpolate_edge((fi, fj + 1.0), (fi + 1.0, fj + 1.0), tr, br, level);
            let bottom = interpolate_edge((fi + 1.0, fj), (fi + 1.0, fj + 1.0), bl, br, level);
            let left = interpolate_edge((fi, fj), (fi + 1.0, fj), tl, bl, level);

            let pairs: &[((f64, f64), (f64, f64))] = match case {
                1 | 14 => &[(left, top)],
                2 | 13 => &[(top, right)],
                3 | 12 => &[(left, right)],
                4 | 11 => &[(right, bottom)],
                5 => &[(left, top), (right, bottom)],
                6 | 9 => &[(top, bottom)],
                7 | 8 => &[(left, bottom)],
                10 => &[(top, right), (left, bottom)],
                _ => &[],
            };
            segments.extend(pairs.iter().map(|&(a, b)| Segment {
                start: to_data(a),
                end: to_data(b),
            }));
        }
    }
    segments
}

/// Crossing point of `level` on the edge between two index points
fn interpolate_edge(
    p1: (f64, f64),
    p2: (f64, f64),
    v1: f64,
    v2: f64,
    level: f64,
) -> (f64, f64) {
    if (v2 - v1).abs() < 1e-12 {
        return ((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_single_crossing_in_data_coords() {
        let z = array![[0.0, 2.0], [0.0, 2.0]];
        let segments = march_squares(&[10.0, 20.0], &[0.0, 5.0], z.view(), 1.0);
        assert_eq!(segments.len(), 1);
        let s = segments[0];
        assert!((s.start.0 - 15.0).abs() < 1e-9 && (s.end.0 - 15.0).abs() < 1e-9);
        let ys = [s.start.1, s.end.1];
        assert!(ys.contains(&0.0) && ys.contains(&5.0));
    }

    #[test]
    fn test_saddle_and_flat_cells() {
        let saddle = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(march_squares(&[0.0, 1.0], &[0.0, 1.0], saddle.view(), 0.5).len(), 2);

        let flat = array![[1.0, 1.0], [1.0, 1.0]];
        assert!(march_squares(&[0.0, 1.0], &[0.0, 1.0], flat.view(), 0.5).is_empty());
    }

    #[test]
    fn test_nan_cells_skipped_and_bad_shapes() {
        let z = array![[f64::NAN, 2.0], [0.0, 2.0]];
        assert!(march_squares(&[0.0, 1.0], &[0.0, 1.0], z.view(), 1.0).is_empty());
        let z = array![[0.0, 2.0], [0.0, 2.0]];
        assert!(march_squares(&[0.0, 1.0, 2.0], &[0.0, 1.0], z.view(), 1.0).is_empty());
    }
}
