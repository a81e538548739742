//! ---------------------------------------------------------------------------
//! Software (CPU) back-end
//!
//! * Owns a `Vec<u32>` frame in **0x00RRGGBB** format.
//! * Keeps a pre-rendered background layer that is copied in at the start
//!   of every frame; triangles are painted over it back-to-front, so no
//!   Z-buffer is needed.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{Canvas, Renderer, Rgba},
    world::color::{Background, Color, generate_checkerboard},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    background_layer: Vec<Rgba>,
    background: Option<Background>,
    layer_dirty: bool,
    width: usize,
    height: usize,
}

impl Software {
    pub fn new() -> Self {
        Self { layer_dirty: true, ..Self::default() }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current frame contents.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    /// Pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }

    fn rebuild_background(&mut self) {
        let (w, h) = (self.width, self.height);
        let colors = match self.background {
            Some(bg) => bg.fill(w, h),
            None => generate_checkerboard(w, h, Color::LIGHT_GRAY, Color::DARK_GRAY),
        };
        self.background_layer.clear();
        self.background_layer.extend(colors.into_iter().map(Color::to_rgb_u32));
        self.layer_dirty = false;
    }
}

/*──────────────────────── Canvas / Renderer impl ─────────────────────*/

impl Canvas for Software {
    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.scratch[y as usize * self.width + x as usize] = color.to_rgb_u32();
    }

    fn extent(&self) -> Option<(usize, usize)> {
        Some((self.width, self.height))
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.layer_dirty = true;
        }
        if self.layer_dirty || self.background_layer.len() != w * h {
            self.rebuild_background();
        }
        self.scratch.copy_from_slice(&self.background_layer);
    }

    fn set_background(&mut self, background: Option<Background>) {
        if background != self.background {
            self.background = background;
            self.layer_dirty = true;
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::Vec2, renderer::raster::draw_filled_triangle};

    #[test]
    fn frame_starts_with_checkerboard() {
        let mut sw = Software::new();
        sw.begin_frame(64, 64);
        assert_eq!(sw.pixel(0, 0), Some(Color::LIGHT_GRAY.to_rgb_u32()));
        assert_eq!(sw.pixel(32, 0), Some(Color::DARK_GRAY.to_rgb_u32()));
        assert_eq!(sw.pixel(64, 0), None);
    }

    #[test]
    fn gradient_background_replaces_checkerboard() {
        let mut sw = Software::new();
        sw.set_background(Some(Background::new(Color::RED, Color::BLUE)));
        sw.begin_frame(4, 10);
        assert_eq!(sw.pixel(3, 0), Some(Color::RED.to_rgb_u32()));
        assert_eq!(sw.pixel(0, 5), Some(Color::new(128, 0, 128).to_rgb_u32()));

        sw.set_background(None);
        sw.begin_frame(4, 10);
        assert_eq!(sw.pixel(0, 0), Some(Color::LIGHT_GRAY.to_rgb_u32()));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut sw = Software::new();
        sw.begin_frame(8, 8);
        sw.set_pixel(-1, 0, Color::WHITE);
        sw.set_pixel(0, 8, Color::WHITE);
        sw.set_pixel(7, 7, Color::WHITE);
        let white = Color::WHITE.to_rgb_u32();
        assert_eq!(sw.pixels().iter().filter(|&&p| p == white).count(), 1);
    }

    #[test]
    fn software_renders_triangle_and_submits() {
        let mut sw = Software::new();
        sw.begin_frame(16, 16);
        let tri = [Vec2::new(1.0, 1.0), Vec2::new(12.0, 2.0), Vec2::new(3.0, 14.0)];
        draw_filled_triangle(&mut sw, &tri, Color::GREEN);

        let mut seen = 0;
        sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (16, 16));
            seen = fb.iter().filter(|&&p| p == Color::GREEN.to_rgb_u32()).count();
        });
        assert!(seen > 0, "renderer failed to write any green pixels");
    }
}
