//! 8-bit RGBA colour, blending helpers and the two background layers
//! (vertical gradient and checkerboard).

use std::ops::{Add, Mul};

/// Side of one checkerboard square in pixels.
pub const CHECKER_SIZE: usize = 32;

/// RGBA colour, 0-255 per channel.
///
/// The all-zero value is the transparency sentinel ("no texel"), not
/// ordinary alpha: a colour is transparent only when **all four**
/// channels are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::new(38, 38, 38);
    pub const DARK_GRAY: Color = Color::new(36, 36, 36);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255);

    /// Opaque colour.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Grey level `v` on all three colour channels, opaque.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self == Self::TRANSPARENT
    }

    /// Multiply RGB by `factor` without limiting the factor; each
    /// resulting channel saturates to `0..=255`. Alpha is untouched.
    /// Used to accumulate light contributions, which may exceed 1.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        let ch = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
        Self { r: ch(self.r), g: ch(self.g), b: ch(self.b), a: self.a }
    }

    /// Channel-wise product (`a * b / 255`); keeps `self`'s alpha.
    #[inline]
    pub fn modulate(self, light: Color) -> Self {
        let ch = |c: u8, l: u8| ((c as u16 * l as u16) / 255) as u8;
        Self {
            r: ch(self.r, light.r),
            g: ch(self.g, light.g),
            b: ch(self.b, light.b),
            a: self.a,
        }
    }

    /// Linear blend, `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: ch(self.r, other.r),
            g: ch(self.g, other.g),
            b: ch(self.b, other.b),
            a: ch(self.a, other.a),
        }
    }

    /// `0x00RRGGBB`, the layout minifb presents.
    #[inline]
    pub fn to_rgb_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Saturating per-channel sum (all four channels).
impl Add for Color {
    type Output = Color;
    fn add(self, o: Color) -> Color {
        Color {
            r: self.r.saturating_add(o.r),
            g: self.g.saturating_add(o.g),
            b: self.b.saturating_add(o.b),
            a: self.a.saturating_add(o.a),
        }
    }
}

/// Lighting intensity: the factor is clamped to `[0, 1]` first.
impl Mul<f64> for Color {
    type Output = Color;
    fn mul(self, factor: f64) -> Color {
        self.scale(factor.clamp(0.0, 1.0))
    }
}

/*====================================================================*/
/*                             Backgrounds                            */
/*====================================================================*/

/// Two-stop vertical gradient shipped with map meshes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Background {
    pub top: Color,
    pub bottom: Color,
}

impl Background {
    pub const fn new(top: Color, bottom: Color) -> Self {
        Self { top, bottom }
    }

    /// Colour of screen row `y` on a screen `height` rows tall.
    pub fn at(&self, y: usize, height: usize) -> Color {
        if height == 0 {
            return self.top;
        }
        self.top.lerp(self.bottom, y as f64 / height as f64)
    }

    /// Full-screen row-major buffer; build it once per background change
    /// and blit it every frame.
    pub fn fill(&self, width: usize, height: usize) -> Vec<Color> {
        let mut buf = Vec::with_capacity(width * height);
        for y in 0..height {
            let c = self.at(y, height);
            buf.extend(std::iter::repeat_n(c, width));
        }
        buf
    }
}

/// Row-major checkerboard of [`CHECKER_SIZE`]-pixel squares;
/// `(x/32 + y/32)` even → `a`, odd → `b`.
pub fn generate_checkerboard(width: usize, height: usize, a: Color, b: Color) -> Vec<Color> {
    let mut buf = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let even = (x / CHECKER_SIZE + y / CHECKER_SIZE) % 2 == 0;
            buf.push(if even { a } else { b });
        }
    }
    buf
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
