//! Vector types. glam's double-precision vectors under the short names
//! the rest of the crate uses.

pub use glam::{DVec2 as Vec2, DVec3 as Vec3, DVec4 as Vec4};

/// Homogeneous-coordinate step glam leaves to the caller.
pub trait Homogeneous {
    /// Divide x/y/z by `w`, keeping `w`. A zero `w` leaves the vector
    /// untouched.
    fn perspective_divide(self) -> Self;
}

impl Homogeneous for Vec4 {
    #[inline]
    fn perspective_divide(self) -> Vec4 {
        if self.w == 0.0 {
            return self;
        }
        (self.truncate() / self.w).extend(self.w)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
