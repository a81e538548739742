//! Scanline rasterizer: DDA lines, flat fill and affine texture mapping.
//!
//! All routines take screen-space points (pixels, +Y down), round them to
//! whole pixels and write through a [`Canvas`]. Nothing here fails: pixels
//! outside the canvas or the texture are silently skipped.

use crate::{
    math::Vec2,
    renderer::Canvas,
    world::{
        color::Color,
        texture::{Palette, Tex, Texture},
    },
};

/*──────────────────────────── lines ────────────────────────────────*/

/// Digital differential analyser: steps one pixel along the longer axis
/// and rounds the other. Steps that cannot reach the canvas extent are
/// not visited.
pub fn draw_line<C: Canvas + ?Sized>(c: &mut C, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = x1 as i64 - x0 as i64;
    let dy = y1 as i64 - y0 as i64;
    let len = dx.abs().max(dy.abs());
    if len == 0 {
        c.set_pixel(x0, y0, color);
        return;
    }

    let (x0, y0) = (x0 as f64, y0 as f64);
    let x_inc = dx as f64 / len as f64;
    let y_inc = dy as f64 / len as f64;
    let Some((first, last)) = clip_steps(c.extent(), (x0, y0), (x_inc, y_inc), len) else {
        return;
    };
    for i in first..=last {
        let t = i as f64;
        c.set_pixel((x0 + t * x_inc).round() as i32, (y0 + t * y_inc).round() as i32, color);
    }
}

/// Step range of a DDA line that can land on a `w`×`h` surface, one
/// step wider than needed at each end. `None` when the line misses it.
fn clip_steps(
    extent: Option<(usize, usize)>,
    start: (f64, f64),
    inc: (f64, f64),
    len: i64,
) -> Option<(i64, i64)> {
    let Some((w, h)) = extent else { return Some((0, len)) };
    let (mut lo, mut hi) = (0.0_f64, len as f64);
    for (s, d, size) in [(start.0, inc.0, w), (start.1, inc.1, h)] {
        let (min, max) = (-0.5, size as f64 - 0.5);
        if d == 0.0 {
            if s < min || s > max {
                return None;
            }
        } else {
            let (a, b) = ((min - s) / d, (max - s) / d);
            lo = lo.max(a.min(b));
            hi = hi.min(a.max(b));
        }
    }
    if lo > hi {
        return None;
    }
    Some(((lo.floor() as i64 - 1).max(0), (hi.ceil() as i64 + 1).min(len)))
}

/// Outline of a projected triangle.
pub fn draw_triangle<C: Canvas + ?Sized>(c: &mut C, points: &[Vec2; 3], color: Color) {
    let Some(p) = round_points(points) else { return };
    for i in 0..3 {
        let (a, b) = (p[i], p[(i + 1) % 3]);
        draw_line(c, a.0, a.1, b.0, b.1, color);
    }
}

/*──────────────────────────── fills ────────────────────────────────*/

/// Solid triangle.
pub fn draw_filled_triangle<C: Canvas + ?Sized>(c: &mut C, points: &[Vec2; 3], color: Color) {
    let Some(p) = round_points(points) else { return };
    scan_triangle(c, p, |c, x, y| c.set_pixel(x, y, color));
}

/// Affine-mapped triangle.
///
/// Each pixel gets barycentric weights against the triangle as given
/// (unsorted), which blend the three UVs. The texel then goes through
/// the palette when there is one. Transparent texels are not written.
/// When `light` is set the texel colour is modulated by it.
pub fn draw_textured_triangle<C: Canvas + ?Sized>(
    c: &mut C,
    points: &[Vec2; 3],
    uv: &[Tex; 3],
    texture: &Texture,
    palette: Option<&Palette>,
    light: Option<Color>,
) {
    let Some(p) = round_points(points) else { return };
    let [a, b, cc] = p.map(|(x, y)| Vec2::new(x as f64, y as f64));
    // zero-area triangles have no defined weights
    if barycentric_weights(a, b, cc, a).is_none() {
        return;
    }

    scan_triangle(c, p, |c, x, y| {
        let Some((alpha, beta, gamma)) = barycentric_weights(a, b, cc, Vec2::new(x as f64, y as f64))
        else {
            return;
        };
        let tex = Tex::new(
            alpha * uv[0].u + beta * uv[1].u + gamma * uv[2].u,
            alpha * uv[0].v + beta * uv[1].v + gamma * uv[2].v,
        );
        let Some(color) = texture.sample(tex).and_then(|s| s.resolve(palette)) else {
            return;
        };
        if color.is_transparent() {
            return;
        }
        c.set_pixel(x, y, light.map_or(color, |l| color.modulate(l)));
    });
}

/// Weights `(alpha, beta, gamma)` of `p` relative to triangle `a, b, c`;
/// they sum to 1. `None` when the triangle has (almost) no area.
pub fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<(f64, f64, f64)> {
    let ac = c - a;
    let ab = b - a;
    let ap = p - a;
    let pc = c - p;
    let pb = b - p;

    let area = ac.perp_dot(ab);
    if area.abs() < 1e-12 || !area.is_finite() {
        return None;
    }
    let alpha = pc.perp_dot(pb) / area;
    let beta = ac.perp_dot(ap) / area;
    Some((alpha, beta, 1.0 - alpha - beta))
}

/*──────────────────────── scanline core ────────────────────────────*/

type Point = (i32, i32);

fn round_points(points: &[Vec2; 3]) -> Option<[Point; 3]> {
    if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return None;
    }
    Some(points.map(|p| (p.x.round() as i32, p.y.round() as i32)))
}

/// Visit every pixel of the triangle, row by row.
///
/// Vertices are sorted by y. A flat-bottom half runs from the top vertex
/// down, a flat-top half from the bottom vertex up; the general case is
/// split at the middle vertex's row, which only the upper half draws.
fn scan_triangle<C, F>(c: &mut C, p: [Point; 3], mut plot: F)
where
    C: Canvas + ?Sized,
    F: FnMut(&mut C, i32, i32),
{
    let mut v = p;
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
    if v[1].1 > v[2].1 {
        v.swap(1, 2);
    }
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
    let [(x0, y0), (x1, y1), (x2, y2)] = v.map(|(x, y)| (x as f64, y as f64));
    let extent = c.extent();

    if y0 == y2 {
        // zero height: one span covering all three vertices
        let lo = x0.min(x1).min(x2);
        let hi = x0.max(x1).max(x2);
        span(c, extent, y0 as i32, lo, hi, &mut plot);
    } else if y1 == y2 {
        fill_flat_bottom(c, extent, (x0, y0), (x1, y1), (x2, y2), &mut plot);
    } else if y0 == y1 {
        fill_flat_top(c, extent, (x0, y0), (x1, y1), (x2, y2), y0 as i32, &mut plot);
    } else {
        let mx = x0 + (x2 - x0) * (y1 - y0) / (y2 - y0);
        fill_flat_bottom(c, extent, (x0, y0), (x1, y1), (mx, y1), &mut plot);
        fill_flat_top(c, extent, (x1, y1), (mx, y1), (x2, y2), y1 as i32 + 1, &mut plot);
    }
}

/// `top` above a horizontal edge `l`-`r`.
fn fill_flat_bottom<C, F>(
    c: &mut C,
    extent: Option<(usize, usize)>,
    top: (f64, f64),
    l: (f64, f64),
    r: (f64, f64),
    plot: &mut F,
) where
    C: Canvas + ?Sized,
    F: FnMut(&mut C, i32, i32),
{
    let inv_l = (l.0 - top.0) / (l.1 - top.1);
    let inv_r = (r.0 - top.0) / (r.1 - top.1);
    let (first, last) = clip_rows(extent, top.1 as i32, l.1 as i32);
    for y in first..=last {
        let dy = y as f64 - top.1;
        span(c, extent, y, top.0 + inv_l * dy, top.0 + inv_r * dy, plot);
    }
}

/// Horizontal edge `l`-`r` above `bottom`, drawn from `bottom` up to
/// row `first_row`.
fn fill_flat_top<C, F>(
    c: &mut C,
    extent: Option<(usize, usize)>,
    l: (f64, f64),
    r: (f64, f64),
    bottom: (f64, f64),
    first_row: i32,
    plot: &mut F,
) where
    C: Canvas + ?Sized,
    F: FnMut(&mut C, i32, i32),
{
    let inv_l = (bottom.0 - l.0) / (bottom.1 - l.1);
    let inv_r = (bottom.0 - r.0) / (bottom.1 - r.1);
    let (first, last) = clip_rows(extent, first_row, bottom.1 as i32);
    for y in (first..=last).rev() {
        let dy = bottom.1 - y as f64;
        span(c, extent, y, bottom.0 - inv_l * dy, bottom.0 - inv_r * dy, plot);
    }
}

fn clip_rows(extent: Option<(usize, usize)>, first: i32, last: i32) -> (i32, i32) {
    match extent {
        Some((_, h)) => (first.max(0), last.min(h as i32 - 1)),
        None => (first, last),
    }
}

/// Inclusive run from `round(min)` to `round(max)` on row `y`.
fn span<C, F>(c: &mut C, extent: Option<(usize, usize)>, y: i32, xa: f64, xb: f64, plot: &mut F)
where
    C: Canvas + ?Sized,
    F: FnMut(&mut C, i32, i32),
{
    let mut lo = xa.min(xb).round() as i32;
    let mut hi = xa.max(xb).round() as i32;
    if let Some((w, h)) = extent {
        if y < 0 || y >= h as i32 {
            return;
        }
        lo = lo.max(0);
        hi = hi.min(w as i32 - 1);
    }
    for x in lo..=hi {
        plot(c, x, y);
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pts(p: [(f64, f64); 3]) -> [Vec2; 3] {
        p.map(|(x, y)| Vec2::new(x, y))
    }

    fn collect(f: impl FnOnce(&mut dyn FnMut(i32, i32, Color))) -> Vec<(i32, i32, Color)> {
        let mut out = Vec::new();
        f(&mut |x, y, c| out.push((x, y, c)));
        out
    }

    #[test]
    fn line_between_equal_points_is_one_pixel() {
        let px = collect(|c| draw_line(c, 4, 7, 4, 7, Color::RED));
        assert_eq!(px, vec![(4, 7, Color::RED)]);
    }

    #[test]
    fn line_steps_along_longest_axis() {
        let px = collect(|c| draw_line(c, 0, 0, 6, 2, Color::WHITE));
        assert_eq!(px.len(), 7);
        assert_eq!((px[0].0, px[0].1), (0, 0));
        assert_eq!((px[6].0, px[6].1), (6, 2));
        assert!(px.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn right_triangle_fill_is_exact() {
        let px = collect(|c| {
            draw_filled_triangle(c, &pts([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]), Color::WHITE)
        });
        let set: HashSet<(i32, i32)> = px.iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(px.len(), 66);
        assert_eq!(set.len(), 66);
        assert!(set.iter().all(|&(x, y)| x >= 0 && y >= 0 && x + y <= 10));
    }

    #[test]
    fn general_triangle_covers_all_three_vertices() {
        let p = pts([(5.0, 0.0), (0.0, 6.0), (9.0, 11.0)]);
        let px = collect(|c| draw_filled_triangle(c, &p, Color::WHITE));
        let set: HashSet<(i32, i32)> = px.iter().map(|&(x, y, _)| (x, y)).collect();
        for v in p {
            assert!(set.contains(&(v.x as i32, v.y as i32)));
        }
        assert!(set.iter().all(|&(_, y)| (0..=11).contains(&y)));
    }

    #[test]
    fn split_triangle_writes_each_pixel_once() {
        let p = pts([(5.0, 0.0), (0.0, 6.0), (9.0, 11.0)]);
        let px = collect(|c| draw_filled_triangle(c, &p, Color::WHITE));
        let set: HashSet<(i32, i32)> = px.iter().map(|&(x, y, _)| (x, y)).collect();
        assert_eq!(px.len(), set.len());
        assert_eq!(set.len(), 51);
        // the middle vertex row is present exactly once
        assert_eq!(px.iter().filter(|p| p.1 == 6).count(), 8);
    }

    #[test]
    fn zero_height_triangle_is_a_single_span() {
        let px = collect(|c| {
            draw_filled_triangle(c, &pts([(3.0, 2.0), (-1.0, 2.0), (7.0, 2.0)]), Color::WHITE)
        });
        let xs: Vec<i32> = px.iter().map(|p| p.0).collect();
        assert_eq!(xs, (-1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn non_finite_points_draw_nothing() {
        let p = pts([(f64::NAN, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(collect(|c| draw_filled_triangle(c, &p, Color::WHITE)).is_empty());
        assert!(collect(|c| draw_triangle(c, &p, Color::WHITE)).is_empty());
    }

    #[test]
    fn barycentric_weights_partition_unity() {
        let (a, b, c) = (Vec2::new(1.0, 2.0), Vec2::new(9.0, 3.0), Vec2::new(4.0, 11.0));
        for p in [Vec2::new(3.0, 4.0), Vec2::new(-5.0, 20.0), Vec2::new(4.5, 5.5)] {
            let (x, y, z) = barycentric_weights(a, b, c, p).unwrap();
            assert!((x + y + z - 1.0).abs() < 1e-12);
        }
        let at = |p| barycentric_weights(a, b, c, p).unwrap();
        let close = |w: (f64, f64, f64), e: (f64, f64, f64)| {
            (w.0 - e.0).abs() < 1e-12 && (w.1 - e.1).abs() < 1e-12 && (w.2 - e.2).abs() < 1e-12
        };
        assert!(close(at(a), (1.0, 0.0, 0.0)));
        assert!(close(at(b), (0.0, 1.0, 0.0)));
        assert!(close(at(c), (0.0, 0.0, 1.0)));
        assert_eq!(barycentric_weights(a, a, b, c), None);
    }

    fn uv() -> [Tex; 3] {
        [Tex::new(0.0, 0.0), Tex::new(0.99, 0.0), Tex::new(0.0, 0.99)]
    }

    #[test]
    fn palette_index_reaches_the_canvas() {
        let tex = Texture::indexed(4, 4, vec![5; 16]).unwrap();
        let mut pal = Palette::default();
        pal[5] = Color::rgba(10, 20, 30, 255);
        let p = pts([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)]);
        let px = collect(|c| draw_textured_triangle(c, &p, &uv(), &tex, Some(&pal), None));
        assert!(!px.is_empty());
        assert!(px.iter().all(|&(_, _, c)| c == Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn transparent_palette_entry_writes_nothing() {
        let tex = Texture::indexed(4, 4, vec![3; 16]).unwrap();
        let pal = Palette::default();
        assert!(pal[3].is_transparent());
        let p = pts([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)]);
        let px = collect(|c| draw_textured_triangle(c, &p, &uv(), &tex, Some(&pal), None));
        assert!(px.is_empty());
    }

    #[test]
    fn light_modulates_texels() {
        let tex = Texture::new(2, 2, vec![Color::new(200, 100, 50); 4]).unwrap();
        let p = pts([(0.0, 0.0), (6.0, 0.0), (0.0, 6.0)]);
        let gray = Color::gray(127);
        let px = collect(|c| draw_textured_triangle(c, &p, &uv(), &tex, None, Some(gray)));
        assert!(!px.is_empty());
        assert!(px.iter().all(|&(_, _, c)| c == Color::new(99, 49, 24)));
    }

    #[test]
    fn unit_uv_corners_sample_the_last_texel() {
        let tex = Texture::new(4, 4, vec![Color::WHITE; 16]).unwrap();
        let p = pts([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)]);
        let full = [Tex::new(0.0, 0.0), Tex::new(1.0, 0.0), Tex::new(0.0, 1.0)];
        let flat = collect(|c| draw_filled_triangle(c, &p, Color::WHITE));
        let textured = collect(|c| draw_textured_triangle(c, &p, &full, &tex, None, None));
        assert_eq!(flat.len(), 45);
        assert_eq!(textured, flat);
        assert!(textured.iter().any(|&(x, y, _)| (x, y) == (8, 0)));
        assert!(textured.iter().any(|&(x, y, _)| (x, y) == (0, 8)));
    }

    #[test]
    fn degenerate_textured_triangle_is_skipped() {
        let tex = Texture::new(1, 1, vec![Color::WHITE]).unwrap();
        let p = pts([(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        assert!(collect(|c| draw_textured_triangle(c, &p, &uv(), &tex, None, None)).is_empty());
    }

    #[test]
    fn extent_clips_rows_and_columns() {
        struct Sink(Vec<(i32, i32)>);
        impl Canvas for Sink {
            fn set_pixel(&mut self, x: i32, y: i32, _: Color) {
                self.0.push((x, y));
            }
            fn extent(&self) -> Option<(usize, usize)> {
                Some((4, 3))
            }
        }
        let mut s = Sink(Vec::new());
        draw_filled_triangle(&mut s, &pts([(-100.0, -100.0), (100.0, -100.0), (0.0, 1e6)]), Color::WHITE);
        assert_eq!(s.0.len(), 12);
        assert!(s.0.iter().all(|&(x, y)| (0..4).contains(&x) && (0..3).contains(&y)));
    }

    #[test]
    fn extent_bounds_line_steps() {
        struct Sink(Vec<(i32, i32)>);
        impl Canvas for Sink {
            fn set_pixel(&mut self, x: i32, y: i32, _: Color) {
                self.0.push((x, y));
            }
            fn extent(&self) -> Option<(usize, usize)> {
                Some((4, 3))
            }
        }
        let mut s = Sink(Vec::new());
        draw_line(&mut s, -1_000_000, 1, 1_000_000, 1, Color::WHITE);
        assert!(s.0.len() <= 8);
        for x in 0..4 {
            assert!(s.0.contains(&(x, 1)));
        }

        let mut s = Sink(Vec::new());
        draw_line(&mut s, -50, -50, -10, 40, Color::WHITE);
        assert!(s.0.is_empty());
    }
}
