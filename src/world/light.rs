//! Flat per-triangle lighting: directional lights plus one ambient term.

use super::color::Color;
use crate::math::Vec3;

/// Fixed boost applied after the ambient term is added. Map lighting is
/// authored dim, so the summed light is doubled before modulation.
pub const EXPOSURE: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector the light travels along.
    pub direction: Vec3,
    pub color: Color,
}

impl DirectionalLight {
    /// `direction` need not be unit length; a zero vector gives a light
    /// that contributes nothing.
    pub fn new(direction: Vec3, color: Color) -> Self {
        Self { direction: direction.try_normalize().unwrap_or(Vec3::ZERO), color }
    }

    /// Light shining from `position` toward `target`.
    pub fn from_points(position: Vec3, target: Vec3, color: Color) -> Self {
        Self::new(target - position, color)
    }

    /// Signed intensity for a surface with unit normal `normal`.
    #[inline]
    pub fn intensity(&self, normal: Vec3) -> f64 {
        -normal.dot(self.direction)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmbientLight {
    pub color: Color,
}

/// Every light attached to a mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lighting {
    pub directional: Vec<DirectionalLight>,
    pub ambient: AmbientLight,
}

impl Lighting {
    /// Accumulated light colour for a triangle with world-space vertices
    /// `v`. Negative contributions clamp to zero per channel; a
    /// degenerate triangle receives only the ambient term.
    pub fn shade(&self, v: &[Vec3; 3]) -> Color {
        let mut acc = Color::rgba(0, 0, 0, 255);
        if let Some(n) = face_normal(v) {
            for light in &self.directional {
                acc = acc + light.color.scale(light.intensity(n));
            }
        }
        (acc + self.ambient.color).scale(EXPOSURE)
    }
}

/// Light colour of a triangle under optional mesh lighting; unlit
/// meshes get white, which leaves texels unchanged when modulated.
#[inline]
pub fn light_color(lighting: Option<&Lighting>, v: &[Vec3; 3]) -> Color {
    lighting.map_or(Color::WHITE, |l| l.shade(v))
}

/// `normalize(cross(b - a, c - a))`, `None` for a zero-area triangle.
#[inline]
pub fn face_normal(v: &[Vec3; 3]) -> Option<Vec3> {
    (v[1] - v[0]).cross(v[2] - v[0]).try_normalize()
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    // faces -Z with this winding
    const FRONT: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
    ];

    #[test]
    fn face_normal_follows_winding() {
        assert_eq!(face_normal(&FRONT), Some(-Vec3::Z));
        assert_eq!(face_normal(&[Vec3::ZERO, Vec3::X, Vec3::X * 2.0]), None);
    }

    #[test]
    fn head_on_light_is_full_intensity() {
        let l = DirectionalLight::from_points(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Color::WHITE);
        assert!((l.intensity(-Vec3::Z) - 1.0).abs() < 1e-12);
        assert!((l.intensity(Vec3::Z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn shade_sums_lights_adds_ambient_and_applies_exposure() {
        let lighting = Lighting {
            directional: vec![
                DirectionalLight::new(Vec3::Z, Color::new(40, 0, 0)),
                DirectionalLight::new(Vec3::Z, Color::new(0, 40, 0)),
                // lights the back side only: contributes nothing
                DirectionalLight::new(-Vec3::Z, Color::new(0, 0, 200)),
            ],
            ambient: AmbientLight { color: Color::rgba(10, 10, 10, 0) },
        };
        let c = lighting.shade(&FRONT);
        assert_eq!((c.r, c.g, c.b), (100, 100, 20));
    }

    #[test]
    fn no_lighting_is_white() {
        assert_eq!(light_color(None, &FRONT), Color::WHITE);
    }

    #[test]
    fn degenerate_triangle_gets_ambient_only() {
        let lighting = Lighting {
            directional: vec![DirectionalLight::new(Vec3::Z, Color::WHITE)],
            ambient: AmbientLight { color: Color::new(30, 30, 30) },
        };
        let c = lighting.shade(&[Vec3::ZERO; 3]);
        assert_eq!((c.r, c.g, c.b), (60, 60, 60));
    }
}
