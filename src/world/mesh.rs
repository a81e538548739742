//! Authoring-side geometry: what a mesh supplier hands to the engine.
//!
//! Nothing in here changes per frame. The pipeline reads a [`Mesh`] and
//! writes its results into a separate list of projected triangles.

use thiserror::Error;

use super::{
    color::{Background, Color},
    light::Lighting,
    texture::{Palette, Tex, Texture},
};
use crate::math::Vec3;

/// One triangle exactly as loaded. Vertices are in model space.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGeometry {
    pub vertices: [Vec3; 3],
    pub texcoords: Option<[Tex; 3]>,
    pub normals: Option<[Vec3; 3]>,
    /// Index into [`Mesh::palettes`].
    pub palette: Option<usize>,
    /// Fill colour when the triangle is drawn untextured.
    pub color: Color,
}

impl TriangleGeometry {
    /// Untextured triangle in `color`.
    pub fn new(vertices: [Vec3; 3], color: Color) -> Self {
        Self { vertices, texcoords: None, normals: None, palette: None, color }
    }

    pub fn with_texcoords(mut self, texcoords: [Tex; 3]) -> Self {
        self.texcoords = Some(texcoords);
        self
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_palette(mut self, palette: usize) -> Self {
        self.palette = Some(palette);
        self
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("triangle {triangle}: vertex {vertex} is not finite")]
    NonFiniteVertex { triangle: usize, vertex: usize },

    #[error("triangle {triangle}: texture coordinate {vertex} is not finite")]
    NonFiniteTexcoord { triangle: usize, vertex: usize },

    #[error("triangle {triangle}: palette {palette} out of range ({len} palettes)")]
    PaletteOutOfRange { triangle: usize, palette: usize, len: usize },
}

/// Triangle list plus everything shared by its triangles.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub triangles: Vec<TriangleGeometry>,
    pub texture: Option<Texture>,
    pub palettes: Vec<Palette>,

    /* transform defaults, turned into a world matrix by `Model` */
    pub scale: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub translation: Vec3,

    pub lighting: Option<Lighting>,
    pub background: Option<Background>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            name: String::new(),
            triangles: Vec::new(),
            texture: None,
            palettes: Vec::new(),
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            lighting: None,
            background: None,
        }
    }
}

impl Mesh {
    pub fn new(name: impl Into<String>, triangles: Vec<TriangleGeometry>) -> Self {
        Self { name: name.into(), triangles, ..Self::default() }
    }

    /// Palette referenced by `tri`, if it has one and it exists.
    #[inline]
    pub fn palette_of(&self, tri: &TriangleGeometry) -> Option<&Palette> {
        tri.palette.and_then(|p| self.palettes.get(p))
    }

    /// Reject meshes the pipeline cannot render as-is. Suppliers call
    /// this once at load time.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (i, tri) in self.triangles.iter().enumerate() {
            for (v, p) in tri.vertices.iter().enumerate() {
                if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                    return Err(MeshError::NonFiniteVertex { triangle: i, vertex: v });
                }
            }
            if let Some(uv) = &tri.texcoords {
                for (v, t) in uv.iter().enumerate() {
                    if !(t.u.is_finite() && t.v.is_finite()) {
                        return Err(MeshError::NonFiniteTexcoord { triangle: i, vertex: v });
                    }
                }
            }
            if let Some(p) = tri.palette {
                if p >= self.palettes.len() {
                    return Err(MeshError::PaletteOutOfRange {
                        triangle: i,
                        palette: p,
                        len: self.palettes.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Axis-aligned bounds of every vertex, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.triangles.iter().flat_map(|t| t.vertices.iter().copied());
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Centre of the bounding box (origin for an empty mesh).
    pub fn coord_center(&self) -> Vec3 {
        self.bounds().map_or(Vec3::ZERO, |(lo, hi)| (lo + hi) * 0.5)
    }

    /// Scale every vertex so the largest absolute coordinate becomes 1.
    pub fn normalize_coordinates(&mut self) {
        let max = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .fold(0.0_f64, |m, v| m.max(v.abs().max_element()));
        if max == 0.0 {
            return;
        }
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                *v = *v / max;
            }
        }
    }

    /// Move the bounding-box centre to the origin.
    pub fn center_coordinates(&mut self) {
        let c = self.coord_center();
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                *v = *v - c;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
