//! Rendering abstraction layer.
//!
//! *The pipeline never touches a pixel buffer directly.*
//! The rasterizer writes through a [`Canvas`], and a back-end that owns
//! a frame implements [`Renderer`] on top of it.
//!
//! * Any `FnMut(i32, i32, Color)` is a canvas, which keeps tests and
//!   one-off consumers free of buffer plumbing.
//! * A blanket impl [`RendererExt`] adds `draw_frame` so call-sites stay
//!   short.

use crate::{
    engine::Engine,
    world::color::{Background, Color},
};

pub mod raster;
pub mod software;

pub use software::Software;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Pixel sink used by every raster routine.
pub trait Canvas {
    /// Write one pixel. Coordinates may lie outside the surface; the
    /// canvas drops those writes.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Surface size when known. Raster loops use it to skip off-screen
    /// rows and columns without visiting them.
    fn extent(&self) -> Option<(usize, usize)> {
        None
    }
}

impl<F: FnMut(i32, i32, Color) + ?Sized> Canvas for F {
    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        (*self)(x, y, color)
    }
}

/// Canvas limited to a `width`×`height` surface.
///
/// Writes outside it never reach `inner`, and raster loops see the size
/// through [`Canvas::extent`].
pub struct Clipped<'a, C: ?Sized> {
    inner: &'a mut C,
    width: usize,
    height: usize,
}

impl<'a, C: Canvas + ?Sized> Clipped<'a, C> {
    pub fn new(inner: &'a mut C, width: usize, height: usize) -> Self {
        Self { inner, width, height }
    }
}

impl<C: Canvas + ?Sized> Canvas for Clipped<'_, C> {
    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (w, h) = (self.width, self.height);
        if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
            self.inner.set_pixel(x, y, color);
        }
    }

    fn extent(&self) -> Option<(usize, usize)> {
        Some(match self.inner.extent() {
            Some((w, h)) => (self.width.min(w), self.height.min(h)),
            None => (self.width, self.height),
        })
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer: Canvas {
    /// (Re)allocate internal scratch for the requested resolution and
    /// paint the background layer into it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Select the background layer: a gradient, or `None` for the
    /// default checkerboard.
    fn set_background(&mut self, background: Option<Background>);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Windowed callers pass `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, engine: &Engine, submit: F)
    where
        Self: Sized,
        F: FnOnce(&[Rgba], usize, usize),
    {
        let vp = engine.viewport();
        self.set_background(engine.background());
        self.begin_frame(vp.width, vp.height);
        engine.render(self);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_drops_writes_outside_its_size() {
        let mut px = Vec::new();
        let mut sink = |x: i32, y: i32, _: Color| px.push((x, y));
        let mut c = Clipped::new(&mut sink, 3, 2);
        assert_eq!(c.extent(), Some((3, 2)));
        for (x, y) in [(0, 0), (2, 1), (3, 0), (0, 2), (-1, 0), (0, -1)] {
            c.set_pixel(x, y, Color::WHITE);
        }
        assert_eq!(px, vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn clipped_extent_is_the_smaller_surface() {
        let mut sw = Software::new();
        sw.begin_frame(2, 8);
        let c = Clipped::new(&mut sw, 5, 5);
        assert_eq!(c.extent(), Some((2, 5)));
    }
}
