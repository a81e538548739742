use super::mesh::Mesh;
use crate::math::Matrix;

/// A mesh together with its cached world matrix.
///
/// The matrix is only rebuilt by [`Model::update_matrix`]; editing the
/// mesh transform through [`Model::mesh_mut`] leaves it stale until then.
#[derive(Clone, Debug)]
pub struct Model {
    mesh: Mesh,
    world: Matrix,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        let world = Matrix::world(mesh.scale, mesh.rotation, mesh.translation);
        Self { mesh, world }
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    #[inline]
    pub fn world_matrix(&self) -> &Matrix {
        &self.world
    }

    pub fn update_matrix(&mut self) {
        self.world = Matrix::world(self.mesh.scale, self.mesh.rotation, self.mesh.translation);
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
