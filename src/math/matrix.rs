//! 4×4 transform matrices over [`glam::DMat4`].
//!
//! Vectors are columns: `m * v` transforms `v`, and `a * b` applies `b`
//! first. The view space is left-handed (+X right, +Y up, +Z into the
//! screen) with depth in `[0, 1]`, which is what glam's `*_lh`
//! constructors produce.

use glam::DMat4;
use std::ops::Mul;

use super::vector::{Vec3, Vec4};

/// 4×4 transform. Stored column-major by glam; [`Matrix::row`] reads it
/// row by row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix(pub DMat4);

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<DMat4> for Matrix {
    #[inline]
    fn from(m: DMat4) -> Self {
        Matrix(m)
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix(DMat4::IDENTITY);

    /*──────────────────────── constructors ───────────────────────────*/

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn scale(s: Vec3) -> Self {
        Matrix(DMat4::from_scale(s))
    }

    #[inline]
    pub fn translation(t: Vec3) -> Self {
        Matrix(DMat4::from_translation(t))
    }

    #[inline]
    pub fn rotation_x(angle: f64) -> Self {
        Matrix(DMat4::from_rotation_x(angle))
    }

    #[inline]
    pub fn rotation_y(angle: f64) -> Self {
        Matrix(DMat4::from_rotation_y(angle))
    }

    #[inline]
    pub fn rotation_z(angle: f64) -> Self {
        Matrix(DMat4::from_rotation_z(angle))
    }

    /// Model → world. Applied to a vertex in this fixed order:
    /// scale, rotate X, rotate Y, rotate Z, translate.
    pub fn world(scale: Vec3, rotation: Vec3, translation: Vec3) -> Self {
        Self::translation(translation)
            * Self::rotation_z(rotation.z)
            * Self::rotation_y(rotation.y)
            * Self::rotation_x(rotation.x)
            * Self::scale(scale)
    }

    /// World → view for a camera at `eye` looking at `target`.
    ///
    /// Rows 0..3 hold the orthonormal right / up / forward basis; the
    /// last column moves `eye` to the origin. `up` must not be parallel
    /// to `target - eye`.
    #[inline]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Matrix(DMat4::look_at_lh(eye, target, up))
    }

    /// Perspective projection. `fov` is vertical (radians), `aspect` is
    /// width / height. View-space z lands in `w`, so dividing by `w`
    /// afterwards yields NDC with depth in `[0, 1]`.
    #[inline]
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        Matrix(DMat4::perspective_lh(fov, aspect, near, far))
    }

    /// Orthographic projection of the box `[l,r]×[b,t]×[n,f]` onto
    /// `[-1,1]×[-1,1]×[0,1]`. `w` stays 1.
    #[inline]
    pub fn orthographic(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Self {
        Matrix(DMat4::orthographic_lh(l, r, b, t, n, f))
    }

    /*──────────────────────── operations ─────────────────────────────*/

    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        self.0.mul_vec4(v)
    }

    /// Transform a point (`w = 1`) and drop the resulting `w`.
    #[inline]
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        self.0.mul_vec4(v.extend(1.0)).truncate()
    }

    #[inline]
    pub fn transpose(&self) -> Matrix {
        Matrix(self.0.transpose())
    }

    #[inline]
    pub fn row(&self, row: usize) -> Vec4 {
        self.0.row(row)
    }

    /// First three entries of `row` as a vector (rotation / basis part).
    #[inline]
    pub fn row3(&self, row: usize) -> Vec3 {
        self.0.row(row).truncate()
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    #[inline]
    fn mul(self, b: Matrix) -> Matrix {
        Matrix(self.0 * b.0)
    }
}

impl Mul<Vec4> for Matrix {
    type Output = Vec4;
    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        self.mul_vec4(v)
    }
}

impl Mul<Vec3> for Matrix {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.mul_vec3(v)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Homogeneous;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f64 = 1e-9;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn identity_leaves_vectors_alone() {
        for v in [
            Vec3::ZERO,
            Vec3::new(1.5, -2.0, 3.25),
            Vec3::new(-1e6, 1e-6, 42.0),
        ] {
            assert_eq!(Matrix::identity().mul_vec3(v), v);
        }
    }

    #[test]
    fn rotation_then_inverse_rotation_round_trips() {
        let v = Vec3::new(0.3, -0.5, 0.8).normalize();
        for theta in [0.1, 1.0, 2.5, -4.0] {
            for (fwd, back) in [
                (Matrix::rotation_x(theta), Matrix::rotation_x(-theta)),
                (Matrix::rotation_y(theta), Matrix::rotation_y(-theta)),
                (Matrix::rotation_z(theta), Matrix::rotation_z(-theta)),
            ] {
                assert!(close(back.mul_vec3(fwd.mul_vec3(v)), v));
            }
        }
    }

    #[test]
    fn cardinal_rotations_move_axes() {
        assert!(close(Matrix::rotation_z(FRAC_PI_2).mul_vec3(Vec3::X), Vec3::Y));
        assert!(close(Matrix::rotation_x(FRAC_PI_2).mul_vec3(Vec3::Y), Vec3::Z));
        assert!(close(Matrix::rotation_y(FRAC_PI_2).mul_vec3(Vec3::Z), Vec3::X));
    }

    #[test]
    fn world_applies_scale_rot_translate_in_order() {
        let s = Vec3::new(2.0, 3.0, 4.0);
        let r = Vec3::new(0.4, -1.1, 0.7);
        let t = Vec3::new(5.0, -6.0, 7.0);
        let p = Vec3::new(1.0, -2.0, 0.5);

        let mut expected = Matrix::scale(s).mul_vec3(p);
        expected = Matrix::rotation_x(r.x).mul_vec3(expected);
        expected = Matrix::rotation_y(r.y).mul_vec3(expected);
        expected = Matrix::rotation_z(r.z).mul_vec3(expected);
        expected = Matrix::translation(t).mul_vec3(expected);

        assert!(close(Matrix::world(s, r, t).mul_vec3(p), expected));
    }

    #[test]
    fn look_at_rotation_rows_are_orthonormal() {
        let cases = [
            (Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y),
            (Vec3::new(3.0, 4.0, -2.0), Vec3::new(1.0, 0.5, 0.0), Vec3::Y),
            (Vec3::new(-7.0, 1.0, 9.0), Vec3::new(0.0, -3.0, 2.0), Vec3::new(0.2, 1.0, 0.1)),
        ];
        for (eye, target, up) in cases {
            let m = Matrix::look_at(eye, target, up);
            let rows = [m.row3(0), m.row3(1), m.row3(2)];
            for (i, a) in rows.iter().enumerate() {
                assert!((a.length() - 1.0).abs() < EPS, "row {i} not unit length");
                for b in rows.iter().skip(i + 1) {
                    assert!(a.dot(*b).abs() < EPS, "rows not perpendicular");
                }
            }
        }
    }

    #[test]
    fn look_at_puts_eye_at_origin_and_target_on_plus_z() {
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let m = Matrix::look_at(eye, Vec3::ZERO, Vec3::Y);
        assert!(close(m.mul_vec3(eye), Vec3::ZERO));
        assert!(close(m.mul_vec3(Vec3::ZERO), Vec3::new(0.0, 0.0, 5.0)));
        assert!(close(m.mul_vec3(Vec3::X), Vec3::new(1.0, 0.0, 5.0)));
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let (near, far) = (0.1, 100.0);
        let p = Matrix::perspective(FRAC_PI_3, 1.0, near, far);
        let n = p.mul_vec4(Vec3::new(0.0, 0.0, near).extend(1.0)).perspective_divide();
        let f = p.mul_vec4(Vec3::new(0.0, 0.0, far).extend(1.0)).perspective_divide();
        assert!(n.z.abs() < EPS);
        assert!((f.z - 1.0).abs() < EPS);
        assert_eq!(p.mul_vec4(Vec3::new(1.0, 1.0, 7.0).extend(1.0)).w, 7.0);
    }

    #[test]
    fn perspective_frustum_edge_lands_on_ndc_edge() {
        // Top of a 60° frustum at depth d is d*tan(30°).
        let p = Matrix::perspective(FRAC_PI_3, 1.0, 0.1, 100.0);
        let d = 4.0;
        let top = Vec3::new(0.0, d * (FRAC_PI_3 / 2.0).tan(), d);
        let ndc = p.mul_vec4(top.extend(1.0)).perspective_divide();
        assert!((ndc.y - 1.0).abs() < EPS);
    }

    #[test]
    fn orthographic_maps_box_corners_to_ndc() {
        let o = Matrix::orthographic(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);
        let c = o.mul_vec4(Vec3::new(2.0, -1.0, 10.0).extend(1.0));
        assert!(close(c.truncate(), Vec3::new(1.0, -1.0, 1.0)));
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn matrix_product_is_composition() {
        let a = Matrix::rotation_y(0.7);
        let b = Matrix::translation(Vec3::new(1.0, 2.0, 3.0));
        let v = Vec3::new(-1.0, 0.5, 2.0);
        assert!(close((a * b).mul_vec3(v), a.mul_vec3(b.mul_vec3(v))));
        assert_eq!(a * Matrix::IDENTITY, a);
        assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn rows_read_row_major() {
        let t = Matrix::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.row(0), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(t.row(2), Vec4::new(0.0, 0.0, 1.0, 3.0));
        assert_eq!(t.row3(1), Vec3::Y);
        let p = Matrix::perspective(FRAC_PI_3, 1.0, 0.1, 100.0);
        assert_eq!(p.row(3), Vec4::Z);
    }
}
