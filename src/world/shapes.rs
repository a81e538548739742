//! Built-in meshes that need no file on disk.

use super::{
    color::Color,
    mesh::{Mesh, TriangleGeometry},
    texture::Tex,
};
use crate::math::Vec3;

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

// Two triangles per side, wound so the outward face is front-facing.
const CUBE_FACES: [[usize; 3]; 12] = [
    // front (-Z)
    [0, 1, 2],
    [0, 2, 3],
    // right (+X)
    [3, 2, 4],
    [3, 4, 5],
    // back (+Z)
    [5, 4, 6],
    [5, 6, 7],
    // left (-X)
    [7, 6, 1],
    [7, 1, 0],
    // top (+Y)
    [1, 6, 4],
    [1, 4, 2],
    // bottom (-Y)
    [5, 7, 0],
    [5, 0, 3],
];

const FIRST_UV: [Tex; 3] = [Tex::new(0.0, 1.0), Tex::new(0.0, 0.0), Tex::new(1.0, 0.0)];
const SECOND_UV: [Tex; 3] = [Tex::new(0.0, 1.0), Tex::new(1.0, 0.0), Tex::new(1.0, 1.0)];

/// Cube spanning `[-1, 1]` on every axis: 8 corners, 12 triangles,
/// each side mapped once onto the full texture.
pub fn cube() -> Mesh {
    let triangles = CUBE_FACES
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let uv = if i % 2 == 0 { FIRST_UV } else { SECOND_UV };
            TriangleGeometry::new(f.map(|v| CUBE_VERTICES[v]), Color::WHITE).with_texcoords(uv)
        })
        .collect();
    Mesh::new("cube", triangles)
}
