use bitflags::bitflags;

use crate::{
    math::Vec2,
    world::{color::Color, texture::Tex},
};

bitflags! {
    /// Render toggles flipped by the front-end.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderOptions: u8 {
        const SHOW_TEXTURE   = 0b0000_0001;
        const SHOW_WIREFRAME = 0b0000_0010;
        const SHOW_LIGHTING  = 0b0000_0100;
        const AUTO_ROTATE    = 0b0000_1000;
        /// Paint the mesh's gradient instead of the checkerboard.
        const MAP_BACKGROUND = 0b0001_0000;
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::SHOW_TEXTURE | Self::SHOW_LIGHTING
    }
}

/// Constants that depend on the frame-buffer, not on the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub half_w: f64,
    pub half_h: f64,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            half_w: width as f64 * 0.5,
            half_h: height as f64 * 0.5,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 { 1.0 } else { self.width as f64 / self.height as f64 }
    }
}

/// Screen-space output of the pipeline for one front-facing triangle.
///
/// Rebuilt from scratch every frame; never written back into the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedTriangle {
    /// Pixels, +Y down.
    pub points: [Vec2; 3],
    pub texcoords: Option<[Tex; 3]>,
    /// Index into the mesh palettes.
    pub palette: Option<usize>,
    pub color: Color,
    pub light_color: Color,
    /// Mean view-space z of the three vertices; the sort key.
    pub avg_depth: f64,
    /// Position of the source triangle in the mesh.
    pub source: usize,
}

/// Counters from the last `update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub total: usize,
    pub visible: usize,
    pub culled: usize,
}
