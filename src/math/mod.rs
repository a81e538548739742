//! Vector / matrix math used by every stage of the pipeline, built on
//! glam's `f64` types.
//!
//! Everything is `Copy`; no function here has side effects.

pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::{Homogeneous, Vec2, Vec3, Vec4};
