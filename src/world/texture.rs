// Format-agnostic texture storage decoded by the mesh suppliers.
// The rasterizer only ever asks a texture for a `PixelSource` and
// resolves it against the triangle's palette.

use std::ops::{Index, IndexMut};

use super::color::{Color, generate_checkerboard};

/// Number of entries in one palette.
pub const PALETTE_LEN: usize = 16;

/// Normalised texture coordinate, both axes in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tex {
    pub u: f64,
    pub v: f64,
}

impl Tex {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// What a texel holds before the palette is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelSource {
    /// Literal colour.
    Direct(Color),
    /// Index into the triangle's palette.
    PaletteIndex(u8),
}

impl PixelSource {
    /// Final colour of the texel.
    ///
    /// With a palette attached the texel is always an index: a
    /// `Direct` colour contributes its red channel as the index. Without
    /// a palette an index shows up as the grey level it encodes.
    /// `None` when the index falls outside the palette.
    #[inline]
    pub fn resolve(self, palette: Option<&Palette>) -> Option<Color> {
        match (self, palette) {
            (PixelSource::Direct(c), None) => Some(c),
            (PixelSource::Direct(c), Some(p)) => p.get(c.r as usize),
            (PixelSource::PaletteIndex(i), Some(p)) => p.get(i as usize),
            (PixelSource::PaletteIndex(i), None) => Some(Color::gray(i)),
        }
    }
}

/// 16-colour lookup table referenced by textured triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Palette(pub [Color; PALETTE_LEN]);

impl Palette {
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Color> {
        self.0.get(idx).copied()
    }
}

impl Index<usize> for Palette {
    type Output = Color;
    fn index(&self, idx: usize) -> &Color {
        &self.0[idx]
    }
}

impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut Color {
        &mut self.0[idx]
    }
}

/// Row-major texel storage.
#[derive(Clone, Debug, PartialEq)]
pub enum Texels {
    Direct(Vec<Color>),
    Indexed(Vec<u8>),
}

impl Texels {
    fn len(&self) -> usize {
        match self {
            Texels::Direct(v) => v.len(),
            Texels::Indexed(v) => v.len(),
        }
    }
}

/// Things that can go wrong when building a texture.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture has zero size ({width}x{height})")]
    Empty { width: usize, height: usize },

    #[error("texture {width}x{height} needs {} texels, got {len}", width * height)]
    SizeMismatch { width: usize, height: usize, len: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    width: usize,
    height: usize,
    texels: Texels,
}

impl Texture {
    /// Direct-colour texture.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, TextureError> {
        Self::from_texels(width, height, Texels::Direct(pixels))
    }

    /// Palette-index texture.
    pub fn indexed(width: usize, height: usize, indices: Vec<u8>) -> Result<Self, TextureError> {
        Self::from_texels(width, height, Texels::Indexed(indices))
    }

    pub fn from_texels(width: usize, height: usize, texels: Texels) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if texels.len() != width * height {
            return Err(TextureError::SizeMismatch { width, height, len: texels.len() });
        }
        Ok(Self { name: String::new(), width, height, texels })
    }

    /// Direct-colour checkerboard, used when a mesh has UVs but no image.
    pub fn checkerboard(width: usize, height: usize, a: Color, b: Color) -> Self {
        Self {
            name: "CHECKER".to_string(),
            width: width.max(1),
            height: height.max(1),
            texels: Texels::Direct(generate_checkerboard(width.max(1), height.max(1), a, b)),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn texels(&self) -> &Texels {
        &self.texels
    }

    /// Texel at integer coordinates, `None` outside the image.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Option<PixelSource> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        Some(match &self.texels {
            Texels::Direct(v) => PixelSource::Direct(v[i]),
            Texels::Indexed(v) => PixelSource::PaletteIndex(v[i]),
        })
    }

    /// Nearest texel for `(u, v)`: `floor(u*w), floor(v*h)`, no wrapping.
    /// A coordinate of exactly 1 selects the last column or row.
    #[inline]
    pub fn sample(&self, uv: Tex) -> Option<PixelSource> {
        let x = texel_coord(uv.u, self.width);
        let y = texel_coord(uv.v, self.height);
        // also rejects NaN
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.texel(x as usize, y as usize)
    }
}

#[inline]
fn texel_coord(t: f64, size: usize) -> f64 {
    if t == 1.0 { size as f64 - 1.0 } else { (t * size as f64).floor() }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
