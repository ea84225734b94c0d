//! Raster rendering of a figure scene.
//!
//! Each axes is filled with its face color, then its artists are painted
//! in order. Text artists keep their geometry in the scene but are not
//! rasterized.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use image::{imageops, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::colormaps::Colormap;
use crate::error::{GplotError, Result};
use crate::interpolation::common::coord_to_index;
use crate::interpolation::{bilinear::BilinearInterpolator, Interpolator};
use crate::layout::colorbar::{extend_shift_scale, Orientation};

use super::artist::{
    Artist, BarbsArtist, ColorbarArtist, ContourLines, Coords, FilledContour, HatchArtist,
    ImageArtist, Imagery, LineArtist, MeshArtist, Polylines, QuiverArtist, QuiverKeyArtist,
};
use super::barbs::{barb_glyph, find_tails};
use super::contour::march_squares;
use super::figure::{Axes, Figure};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const TICK_PX: f64 = 4.0;

/// Pixel bounds and data limits of one axes
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    xlim: (f64, f64),
    ylim: (f64, f64),
}

impl Frame {
    fn new(figure: &Figure, axes: &Axes) -> Self {
        let (l, t, r, b) = axes.rect.to_pixels(figure.width_px, figure.height_px);
        Self {
            left: l as f64,
            top: t as f64,
            right: r as f64,
            bottom: b as f64,
            xlim: axes.xlim.unwrap_or((0.0, 1.0)),
            ylim: axes.ylim.unwrap_or((0.0, 1.0)),
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn data_to_px(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = (x - self.xlim.0) / (self.xlim.1 - self.xlim.0);
        let fy = (y - self.ylim.0) / (self.ylim.1 - self.ylim.0);
        (self.left + fx * self.width(), self.bottom - fy * self.height())
    }

    fn px_to_data(&self, px: f64, py: f64) -> (f64, f64) {
        let fx = (px - self.left) / self.width();
        let fy = (self.bottom - py) / self.height();
        (
            self.xlim.0 + fx * (self.xlim.1 - self.xlim.0),
            self.ylim.0 + fy * (self.ylim.1 - self.ylim.0),
        )
    }

    fn axes_to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (self.left + x * self.width(), self.bottom - y * self.height())
    }

    /// Integer pixel range covered by the frame, clipped to the image
    fn pixels(&self, img: &RgbaImage) -> impl Iterator<Item = (u32, u32)> {
        let x0 = self.left.max(0.0) as u32;
        let y0 = self.top.max(0.0) as u32;
        let x1 = (self.right.max(0.0) as u32).min(img.width());
        let y1 = (self.bottom.max(0.0) as u32).min(img.height());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Alpha-blend `color` over the pixel
fn blend(img: &mut RgbaImage, x: i64, y: i64, color: [u8; 4], alpha: f64) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let a = (color[3] as f64 / 255.0 * alpha).clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        px.0[c] = (color[c] as f64 * a + px.0[c] as f64 * (1.0 - a)).round() as u8;
    }
    px.0[3] = (255.0 * a + px.0[3] as f64 * (1.0 - a)).round() as u8;
}

fn draw_line(
    img: &mut RgbaImage,
    p0: (f64, f64),
    p1: (f64, f64),
    color: [u8; 4],
    width: f64,
    dashed: bool,
) {
    let len = (p1.0 - p0.0).hypot(p1.1 - p0.1);
    let steps = len.ceil().max(1.0) as usize;
    let half = (width / 2.0).max(0.5);
    let r = half.ceil() as i64;
    for s in 0..=steps {
        if dashed && (s / 4) % 2 == 1 {
            continue;
        }
        let t = s as f64 / steps as f64;
        let (x, y) = (p0.0 + t * (p1.0 - p0.0), p0.1 + t * (p1.1 - p0.1));
        for dy in -r + 1..r {
            for dx in -r + 1..r {
                blend(img, x.round() as i64 + dx, y.round() as i64 + dy, color, 1.0);
            }
        }
    }
}

fn fill_triangle(img: &mut RgbaImage, tri: [(f64, f64); 3], color: [u8; 4]) {
    let (min_x, max_x) = tri.iter().fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.0), b.max(p.0)));
    let (min_y, max_y) = tri.iter().fold((f64::MAX, f64::MIN), |(a, b), p| (a.min(p.1), b.max(p.1)));
    let edge = |a: (f64, f64), b: (f64, f64), p: (f64, f64)| {
        (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
    };
    let area = edge(tri[0], tri[1], tri[2]);
    if area == 0.0 {
        return;
    }
    for y in min_y.floor() as i64..=max_y.ceil() as i64 {
        for x in min_x.floor() as i64..=max_x.ceil() as i64 {
            let p = (x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(tri[1], tri[2], p) / area;
            let w1 = edge(tri[2], tri[0], p) / area;
            let w2 = edge(tri[0], tri[1], p) / area;
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                blend(img, x, y, color, 1.0);
            }
        }
    }
}

/// Bilinear sample of a field at a data coordinate
fn sample(x: &[f64], y: &[f64], z: ndarray::ArrayView2<'_, f64>, xd: f64, yd: f64) -> f64 {
    match (coord_to_index(xd, x), coord_to_index(yd, y)) {
        (Some(col), Some(row)) => BilinearInterpolator
            .interpolate(z, row, col)
            .unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn paint_filled_contour(img: &mut RgbaImage, frame: &Frame, cs: &FilledContour) {
    let pixels: Vec<(u32, u32)> = frame.pixels(img).collect();
    for (px, py) in pixels {
        let (xd, yd) = frame.px_to_data(px as f64 + 0.5, py as f64 + 0.5);
        let value = sample(&cs.x, &cs.y, cs.z.view(), xd, yd);
        if let Some(color) = cs.color_at(value) {
            blend(img, px as i64, py as i64, color, cs.alpha);
        }
    }
}

fn paint_contour_lines(img: &mut RgbaImage, frame: &Frame, cl: &ContourLines) {
    for (k, &level) in cl.levels.iter().enumerate() {
        let color = cl.colors.get(k).copied().unwrap_or(BLACK);
        let color = [color[0], color[1], color[2], (color[3] as f64 * cl.alpha) as u8];
        let width = cl.linewidths.get(k).copied().unwrap_or(1.0);
        let dashed = cl.dashed.get(k).copied().unwrap_or(false);
        for seg in march_squares(&cl.x, &cl.y, cl.z.view(), level) {
            let p0 = frame.data_to_px(seg.start.0, seg.start.1);
            let p1 = frame.data_to_px(seg.end.0, seg.end.1);
            draw_line(img, p0, p1, color, width, dashed);
        }
    }
}

fn paint_image(img: &mut RgbaImage, frame: &Frame, im: &ImageArtist) {
    let (nrows, ncols) = im.z.dim();
    if nrows == 0 || ncols == 0 {
        return;
    }
    let [x0, x1, y0, y1] = im.extent;
    let pixels: Vec<(u32, u32)> = frame.pixels(img).collect();
    for (px, py) in pixels {
        let (xd, yd) = frame.px_to_data(px as f64 + 0.5, py as f64 + 0.5);
        let fx = (xd - x0) / (x1 - x0);
        let fy = (yd - y0) / (y1 - y0);
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            continue;
        }
        let col = ((fx * ncols as f64) as usize).min(ncols - 1);
        let row = ((fy * nrows as f64) as usize).min(nrows - 1);
        let value = im.z[[row, col]];
        if value.is_finite() {
            blend(img, px as i64, py as i64, im.cmap.lookup(im.norm.normalize(value)), im.alpha);
        }
    }
}

fn paint_mesh(img: &mut RgbaImage, frame: &Frame, mesh: &MeshArtist) {
    let pixels: Vec<(u32, u32)> = frame.pixels(img).collect();
    for (px, py) in pixels {
        let (xd, yd) = frame.px_to_data(px as f64 + 0.5, py as f64 + 0.5);
        let (Some(col), Some(row)) = (coord_to_index(xd, &mesh.x), coord_to_index(yd, &mesh.y)) else {
            continue;
        };
        let value = mesh.z[[row.round() as usize, col.round() as usize]];
        if value.is_finite() {
            let color = mesh.cmap.lookup(mesh.norm.normalize(value));
            blend(img, px as i64, py as i64, color, mesh.alpha);
        }
    }
}

fn hatched(pattern: char, x: u32, y: u32) -> bool {
    match pattern {
        '.' => x % 6 == 0 && y % 6 == 0,
        'o' | 'O' => (x % 8 == 0 || x % 8 == 1) && (y % 8 == 0 || y % 8 == 1),
        '/' => (x + y) % 8 == 0,
        '\\' => (x + 8 - y % 8) % 8 == 0,
        '-' => y % 6 == 0,
        '|' => x % 6 == 0,
        '+' => x % 8 == 0 || y % 8 == 0,
        'x' | 'X' => (x + y) % 8 == 0 || (x + 8 - y % 8) % 8 == 0,
        _ => (x + y) % 6 == 0,
    }
}

fn paint_hatch(img: &mut RgbaImage, frame: &Frame, h: &HatchArtist) {
    // the band above the second level is hatched
    let Some(&threshold) = h.levels.get(1) else {
        return;
    };
    let pixels: Vec<(u32, u32)> = frame.pixels(img).collect();
    for (px, py) in pixels {
        if !hatched(h.pattern, px, py) {
            continue;
        }
        let (xd, yd) = frame.px_to_data(px as f64 + 0.5, py as f64 + 0.5);
        let value = sample(&h.x, &h.y, h.z.view(), xd, yd);
        if value.is_finite() && value >= threshold {
            blend(img, px as i64, py as i64, h.color, h.alpha);
        }
    }
}

fn draw_arrow(img: &mut RgbaImage, from: (f64, f64), to: (f64, f64), color: [u8; 4], width: f64) {
    draw_line(img, from, to, color, width, false);
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy);
    if len < 1.0 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let head = (len * 0.3).clamp(2.0, 3.0 * width + 4.0);
    let base = (to.0 - ux * head, to.1 - uy * head);
    let spread = head * 0.5;
    fill_triangle(
        img,
        [
            to,
            (base.0 - uy * spread, base.1 + ux * spread),
            (base.0 + uy * spread, base.1 - ux * spread),
        ],
        color,
    );
}

fn paint_quiver(img: &mut RgbaImage, frame: &Frame, q: &QuiverArtist) {
    let scale = q.resolved_scale();
    let width_px = (q.width * frame.width()).max(1.0);
    let color = [q.color[0], q.color[1], q.color[2], (q.color[3] as f64 * q.alpha) as u8];
    for ((i, j), &u) in q.u.indexed_iter() {
        let v = q.v[[i, j]];
        let (Some(&xd), Some(&yd)) = (q.x.get(j), q.y.get(i)) else {
            continue;
        };
        if !(u.is_finite() && v.is_finite()) {
            continue;
        }
        let from = frame.data_to_px(xd, yd);
        let to = (
            from.0 + u / scale * frame.width(),
            from.1 - v / scale * frame.width(),
        );
        draw_arrow(img, from, to, color, width_px);
    }
}

fn paint_quiver_key(img: &mut RgbaImage, frame: &Frame, key: &QuiverKeyArtist, scale: f64) {
    let anchor = frame.axes_to_px(key.x, key.y);
    let len = key.length / scale * frame.width();
    draw_arrow(img, (anchor.0 - len / 2.0, anchor.1), (anchor.0 + len / 2.0, anchor.1), BLACK, 1.5);
}

fn paint_barbs(img: &mut RgbaImage, frame: &Frame, b: &BarbsArtist, dpi: f64) {
    let length_px = b.length * dpi / 72.0;
    let color = [b.color[0], b.color[1], b.color[2], (b.color[3] as f64 * b.alpha) as u8];
    for ((i, j), &u) in b.u.indexed_iter() {
        let v = b.v[[i, j]];
        let (Some(&xd), Some(&yd)) = (b.x.get(j), b.y.get(i)) else {
            continue;
        };
        if !(u.is_finite() && v.is_finite()) {
            continue;
        }
        let tail = find_tails(&[u.hypot(v)], &b.increments, true)[0];
        let (px, py) = frame.data_to_px(xd, yd);
        let glyph = barb_glyph(px, py, u, v, length_px, &tail);
        for line in &glyph.lines {
            for w in line.windows(2) {
                draw_line(img, w[0], w[1], color, 1.0, false);
            }
        }
        for (tri, filled) in &glyph.flags {
            if *filled {
                fill_triangle(img, *tri, color);
            } else {
                for k in 0..3 {
                    draw_line(img, tri[k], tri[(k + 1) % 3], color, 1.0, false);
                }
            }
        }
    }
}

fn paint_polylines(img: &mut RgbaImage, frame: &Frame, p: &Polylines) {
    for line in &p.lines {
        for w in line.windows(2) {
            let a = frame.data_to_px(w[0].0, w[0].1);
            let b = frame.data_to_px(w[1].0, w[1].1);
            draw_line(img, a, b, p.color, p.linewidth, false);
        }
    }
}

fn paint_imagery(img: &mut RgbaImage, frame: &Frame, imagery: &Imagery) {
    let Some(source) = imagery.image.as_deref() else {
        return;
    };
    let [x0, x1, y0, y1] = imagery.extent;
    let (l, t) = frame.data_to_px(x0, y1);
    let (r, b) = frame.data_to_px(x1, y0);
    let (w, h) = ((r - l).round().max(1.0) as u32, (b - t).round().max(1.0) as u32);
    let scaled = imageops::resize(source, w, h, imageops::FilterType::Triangle);
    for (x, y, p) in scaled.enumerate_pixels() {
        blend(img, l.round() as i64 + x as i64, t.round() as i64 + y as i64, p.0, 1.0);
    }
}

fn paint_line(img: &mut RgbaImage, frame: &Frame, line: &LineArtist, figure: &Figure) {
    let to_px = |(x, y): (f64, f64)| match line.coords {
        Coords::Data => frame.data_to_px(x, y),
        Coords::Axes => frame.axes_to_px(x, y),
        Coords::Figure => (x * figure.width_px as f64, (1.0 - y) * figure.height_px as f64),
    };
    for w in line.points.windows(2) {
        draw_line(img, to_px(w[0]), to_px(w[1]), line.color, line.linewidth, false);
    }
}

fn colorbar_color(cb: &ColorbarArtist, value: f64) -> [u8; 4] {
    match cb.boundaries.as_deref() {
        Some(bounds) if bounds.len() >= 2 => {
            let band = bounds
                .windows(2)
                .position(|w| value <= w[1])
                .unwrap_or(bounds.len() - 2);
            let mid = 0.5 * (bounds[band] + bounds[band + 1]);
            cb.cmap.lookup(cb.norm.normalize(mid))
        }
        _ => cb.cmap.lookup(cb.norm.normalize(value)),
    }
}

fn paint_colorbar(img: &mut RgbaImage, frame: &Frame, cb: &ColorbarArtist) {
    let (vmin, vmax) = cb.value_range();
    let (shift, scale) = extend_shift_scale(cb.extend);
    let horizontal = cb.orientation == Orientation::Horizontal;
    // (along, across) axes fraction to pixel
    let at = |along: f64, across: f64| {
        if horizontal {
            frame.axes_to_px(along, across)
        } else {
            frame.axes_to_px(across, along)
        }
    };

    let pixels: Vec<(u32, u32)> = frame.pixels(img).collect();
    for (px, py) in pixels {
        let fx = (px as f64 + 0.5 - frame.left) / frame.width();
        let fy = (frame.bottom - py as f64 - 0.5) / frame.height();
        let along = if horizontal { fx } else { fy };
        let t = (along - shift) / scale;
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let color = colorbar_color(cb, cb.value_at(t));
        blend(img, px as i64, py as i64, color, 1.0);
    }

    if cb.extend.has_min() {
        let color = cb.cmap.under_color().unwrap_or_else(|| colorbar_color(cb, vmin));
        fill_triangle(img, [at(0.0, 0.5), at(shift, 0.0), at(shift, 1.0)], color);
    }
    if cb.extend.has_max() {
        let end = shift + scale;
        let color = cb.cmap.over_color().unwrap_or_else(|| colorbar_color(cb, vmax));
        fill_triangle(img, [at(1.0, 0.5), at(end, 0.0), at(end, 1.0)], color);
    }

    if cb.drawedges {
        if let Some(bounds) = cb.boundaries.as_deref() {
            for &b in bounds {
                let along = shift + scale * cb.position(b);
                draw_line(img, at(along, 0.0), at(along, 1.0), BLACK, 1.0, false);
            }
        }
    }

    let tick_frac = TICK_PX / if horizontal { frame.height() } else { frame.width() };
    for &t in &cb.ticks.bottom {
        let along = shift + scale * cb.position(t);
        draw_line(img, at(along, 0.0), at(along, -tick_frac), BLACK, 1.0, false);
    }

    let outline = [at(shift, 0.0), at(shift + scale, 0.0), at(shift + scale, 1.0), at(shift, 1.0)];
    for k in 0..4 {
        draw_line(img, outline[k], outline[(k + 1) % 4], BLACK, 1.0, false);
    }
}

fn paint_frame(img: &mut RgbaImage, frame: &Frame, axes: &Axes) {
    let corners = [
        (frame.left, frame.top),
        (frame.right, frame.top),
        (frame.right, frame.bottom),
        (frame.left, frame.bottom),
    ];
    for k in 0..4 {
        draw_line(img, corners[k], corners[(k + 1) % 4], BLACK, 1.0, false);
    }
    let sides = axes.xticks.sides;
    for &x in &axes.xticks.values {
        let (px, _) = frame.data_to_px(x, frame.ylim.0);
        if sides.bottom {
            draw_line(img, (px, frame.bottom), (px, frame.bottom + TICK_PX), BLACK, 1.0, false);
        }
        if sides.top {
            draw_line(img, (px, frame.top), (px, frame.top - TICK_PX), BLACK, 1.0, false);
        }
    }
    let sides = axes.yticks.sides;
    for &y in &axes.yticks.values {
        let (_, py) = frame.data_to_px(frame.xlim.0, y);
        if sides.left {
            draw_line(img, (frame.left, py), (frame.left - TICK_PX, py), BLACK, 1.0, false);
        }
        if sides.right {
            draw_line(img, (frame.right, py), (frame.right + TICK_PX, py), BLACK, 1.0, false);
        }
    }
}

fn quiver_scale(axes: &Axes) -> f64 {
    axes.artists()
        .find_map(|a| match a {
            Artist::Quiver(q) => Some(q.resolved_scale()),
            _ => None,
        })
        .unwrap_or(1.0)
}

/// Render every axes of the figure into an RGBA image
pub fn render(figure: &Figure) -> Result<RgbaImage> {
    if figure.width_px == 0 || figure.height_px == 0 {
        return Err(GplotError::ImageGeneration {
            message: format!(
                "Figure size must be positive, got {}x{}",
                figure.width_px, figure.height_px
            ),
        });
    }
    let start = Instant::now();
    let mut img: RgbaImage =
        ImageBuffer::from_pixel(figure.width_px, figure.height_px, Rgba(figure.facecolor));

    for axes in figure.all_axes() {
        let frame = Frame::new(figure, axes);
        let is_colorbar = axes.artists().any(|a| matches!(a, Artist::Colorbar(_)));
        if !is_colorbar {
            let pixels: Vec<(u32, u32)> = frame.pixels(&img).collect();
            for (x, y) in pixels {
                blend(&mut img, x as i64, y as i64, axes.facecolor, 1.0);
            }
        }

        for artist in axes.artists() {
            match artist {
                Artist::FilledContour(a) => paint_filled_contour(&mut img, &frame, a),
                Artist::ContourLines(a) => paint_contour_lines(&mut img, &frame, a),
                Artist::Image(a) => paint_image(&mut img, &frame, a),
                Artist::Mesh(a) => paint_mesh(&mut img, &frame, a),
                Artist::Hatch(a) => paint_hatch(&mut img, &frame, a),
                Artist::Quiver(a) => paint_quiver(&mut img, &frame, a),
                Artist::QuiverKey(a) => paint_quiver_key(&mut img, &frame, a, quiver_scale(axes)),
                Artist::Barbs(a) => paint_barbs(&mut img, &frame, a, figure.dpi),
                Artist::Coastlines(a) | Artist::GridLines(a) => paint_polylines(&mut img, &frame, a),
                Artist::Imagery(a) => paint_imagery(&mut img, &frame, a),
                Artist::Colorbar(a) => paint_colorbar(&mut img, &frame, a),
                Artist::Line(a) => paint_line(&mut img, &frame, a, figure),
                Artist::Text(_) => {}
            }
        }

        if axes.visible_frame && !is_colorbar {
            paint_frame(&mut img, &frame, axes);
        }
    }

    debug!(
        width = figure.width_px,
        height = figure.height_px,
        axes = figure.all_axes().count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Rendered figure"
    );
    Ok(img)
}

/// Render and encode as PNG bytes
pub fn encode_png(figure: &Figure) -> Result<Vec<u8>> {
    let img = render(figure)?;
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| GplotError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(buffer.into_inner())
}

/// Render and write a PNG file
pub fn save_png(figure: &Figure, path: &Path) -> Result<()> {
    let bytes = encode_png(figure)?;
    std::fs::write(path, bytes)?;
    debug!(path = %path.display(), "Wrote PNG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::artist::QuiverArtist;
    use crate::canvas::figure::Rect;
    use crate::colormaps::{get_colormap, Extend, LinearNorm};
    use ndarray::Array2;

    fn field_figure() -> Figure {
        let mut fig = Figure::new(200, 100, 100.0);
        let id = fig.add_axes(Rect::new(0.0, 0.0, 1.0, 1.0));
        let axes = fig.axes_mut(id).unwrap();
        axes.xlim = Some((0.0, 10.0));
        axes.ylim = Some((0.0, 5.0));
        axes.visible_frame = false;
        let x: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let z = Array2::from_shape_fn((6, 11), |(_, j)| j as f64);
        axes.add_artist(Artist::FilledContour(FilledContour {
            x,
            y,
            z,
            levels: vec![0.0, 5.0, 10.0],
            cmap: get_colormap("greys").unwrap(),
            norm: LinearNorm::new(0.0, 10.0).into(),
            extend: Extend::Neither,
            alpha: 1.0,
        }));
        fig
    }

    #[test]
    fn test_filled_contour_bands() {
        let img = render(&field_figure()).unwrap();
        let cmap = get_colormap("greys").unwrap();
        assert_eq!(img.get_pixel(20, 50).0, cmap.map_normalized(0.25));
        assert_eq!(img.get_pixel(180, 50).0, cmap.map_normalized(0.75));
    }

    #[test]
    fn test_png_encoding() {
        let bytes = encode_png(&field_figure()).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        save_png(&field_figure(), &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 100));
    }

    #[test]
    fn test_quiver_draws_arrows() {
        let mut fig = Figure::new(100, 100, 100.0);
        let id = fig.add_axes(Rect::new(0.0, 0.0, 1.0, 1.0));
        let axes = fig.axes_mut(id).unwrap();
        axes.xlim = Some((0.0, 2.0));
        axes.ylim = Some((0.0, 2.0));
        axes.visible_frame = false;
        axes.add_artist(Artist::Quiver(QuiverArtist {
            x: vec![1.0],
            y: vec![1.0],
            u: Array2::from_elem((1, 1), 1.0),
            v: Array2::from_elem((1, 1), 0.0),
            scale: Some(4.0),
            width: 0.02,
            color: BLACK,
            alpha: 1.0,
        }));
        let img = render(&fig).unwrap();
        // arrow runs a quarter of the axes width to the right of the center
        assert_eq!(img.get_pixel(60, 50).0, BLACK);
        assert_eq!(img.get_pixel(40, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_empty_figure_rejected() {
        assert!(render(&Figure::new(0, 10, 100.0)).is_err());
    }
}
