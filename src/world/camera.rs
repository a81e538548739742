use std::f64::consts::{FRAC_PI_3, PI};

use crate::math::{Matrix, Vec3};

/// Tightest zoom (smallest view volume).
pub const ZOOM_MIN: f64 = 0.5;
/// Widest zoom.
pub const ZOOM_MAX: f64 = 2.0;
/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;
/// Keeps the polar angle away from the poles where `look_at` degenerates.
pub const POLE_EPSILON: f64 = 1e-4;

const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Orthographic,
    Perspective,
}

/// Orbit camera circling `target`.
///
/// * `zoom` scales the view volume: ortho half-height is `zoom`,
///   perspective vertical FoV is `60° * zoom`.
/// * Both matrices are rebuilt by every mutator, so readers never see a
///   stale view or projection.
#[derive(Clone, Debug)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
    zoom: f64,
    aspect: f64,
    ground_clamp: bool,

    view: Matrix,
    proj: Matrix,
}

impl Camera {
    /// `aspect` is width / height of the viewport.
    pub fn new(eye: Vec3, target: Vec3, projection: Projection, aspect: f64) -> Self {
        let mut cam = Self {
            eye,
            target,
            up: Vec3::Y,
            projection,
            zoom: 1.0,
            aspect,
            ground_clamp: false,
            view: Matrix::IDENTITY,
            proj: Matrix::IDENTITY,
        };
        cam.update_view();
        cam.update_projection();
        cam
    }

    /*──────────────────────── accessors ─────────────────────────────*/

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    #[inline]
    pub fn view_matrix(&self) -> &Matrix {
        &self.view
    }

    #[inline]
    pub fn projection_matrix(&self) -> &Matrix {
        &self.proj
    }

    /*──────────────────────── mutators ──────────────────────────────*/

    /// Orbit around the target by a mouse delta (pixels) scaled by `dt`.
    ///
    /// Azimuth is free; the polar angle is clamped to
    /// `[POLE_EPSILON, π - POLE_EPSILON]`.
    pub fn process_orbit(&mut self, dx: f64, dy: f64, dt: f64) {
        let tc = self.eye - self.target;
        let radius = tc.length();
        if radius == 0.0 {
            return;
        }

        let theta = tc.x.atan2(tc.z) + dx * dt / 4.0;
        let phi = ((tc.y / radius).clamp(-1.0, 1.0).acos() - dy * dt / 4.0)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);

        let (sin_p, cos_p) = phi.sin_cos();
        let (sin_t, cos_t) = theta.sin_cos();
        let mut offset = Vec3::new(radius * sin_p * sin_t, radius * cos_p, radius * sin_p * cos_t);
        if self.ground_clamp {
            offset.y = offset.y.max(0.0);
        }

        self.eye = self.target + offset;
        self.update_view();
    }

    /// Wheel zoom: positive `amount` zooms in.
    pub fn adjust_zoom(&mut self, amount: f64) {
        self.zoom = (self.zoom - amount * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
        self.update_projection();
    }

    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            Projection::Orthographic => Projection::Perspective,
            Projection::Perspective => Projection::Orthographic,
        };
        self.update_projection();
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Move the orbit centre, carrying the eye along with it.
    pub fn set_target(&mut self, target: Vec3) {
        let offset = self.eye - self.target;
        self.target = target;
        self.eye = target + offset;
        self.update_view();
    }

    /// Keep the eye at or above the target's height while orbiting.
    pub fn set_ground_clamp(&mut self, on: bool) {
        self.ground_clamp = on;
    }

    /*──────────────────────── derived matrices ──────────────────────*/

    fn update_view(&mut self) {
        self.view = Matrix::look_at(self.eye, self.target, self.up);
    }

    fn update_projection(&mut self) {
        self.proj = match self.projection {
            Projection::Orthographic => {
                let h = self.zoom;
                let w = self.zoom * self.aspect;
                Matrix::orthographic(-w, w, -h, h, NEAR, FAR)
            }
            Projection::Perspective => Matrix::perspective(FRAC_PI_3 * self.zoom, self.aspect, NEAR, FAR),
        };
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    fn cam() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Projection::Perspective, 1.0)
    }

    #[test]
    fn zoom_stays_in_bounds() {
        let mut c = cam();
        for _ in 0..10 {
            c.adjust_zoom(100.0);
            assert!(c.zoom() >= ZOOM_MIN);
        }
        assert_eq!(c.zoom(), ZOOM_MIN);
        for _ in 0..10 {
            c.adjust_zoom(-100.0);
            assert!(c.zoom() <= ZOOM_MAX);
        }
        assert_eq!(c.zoom(), ZOOM_MAX);
    }

    #[test]
    fn zoom_rebuilds_projection() {
        let mut c = cam();
        let before = *c.projection_matrix();
        c.adjust_zoom(1.0);
        assert_ne!(before, *c.projection_matrix());
        assert!((c.zoom() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn orbit_keeps_radius_and_updates_view() {
        let mut c = cam();
        let before = *c.view_matrix();
        c.process_orbit(30.0, 10.0, 0.016);
        assert!(((c.eye() - c.target()).length() - 5.0).abs() < 1e-9);
        assert_ne!(before, *c.view_matrix());
        assert_eq!(*c.view_matrix(), Matrix::look_at(c.eye(), c.target(), Vec3::Y));
    }

    #[test]
    fn orbit_never_reaches_the_pole() {
        let mut c = cam();
        for _ in 0..100 {
            c.process_orbit(0.0, -1000.0, 1.0);
        }
        let tc = c.eye() - c.target();
        let phi = (tc.y / tc.length()).acos();
        assert!(phi <= PI - POLE_EPSILON + 1e-9);
        assert!(tc.x.abs() + tc.z.abs() > 0.0);
    }

    #[test]
    fn ground_clamp_keeps_eye_above_target() {
        let mut c = cam();
        c.set_ground_clamp(true);
        for _ in 0..50 {
            c.process_orbit(3.0, -1000.0, 1.0);
            assert!(c.eye().y >= c.target().y);
        }
    }

    #[test]
    fn toggle_switches_mode() {
        let mut c = cam();
        let persp = *c.projection_matrix();
        c.toggle_projection();
        assert_eq!(c.projection(), Projection::Orthographic);
        assert_eq!(c.projection_matrix().row(3), Vec4::W);
        c.toggle_projection();
        assert_eq!(*c.projection_matrix(), persp);
    }

    #[test]
    fn set_target_carries_eye() {
        let mut c = cam();
        c.set_target(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.eye(), Vec3::new(1.0, 2.0, -2.0));
    }
}
