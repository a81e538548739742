pub mod camera;
pub mod color;
pub mod light;
pub mod mesh;
pub mod model;
pub mod shapes;
pub mod texture;

pub use camera::{Camera, Projection};
pub use color::{Background, Color};
pub use light::{AmbientLight, DirectionalLight, Lighting};
pub use mesh::{Mesh, MeshError, TriangleGeometry};
pub use model::Model;
pub use texture::{Palette, PixelSource, Tex, Texels, Texture, TextureError};
