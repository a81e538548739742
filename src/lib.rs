//! Software 3D rasterizer for polygon meshes.
//!
//! * [`world`]: meshes, textures, lights and the orbit camera.
//! * [`engine`]: per-frame transform, light, project, cull and sort.
//! * [`renderer`]: pixel sinks and the scanline rasterizer.
//! * [`obj`] and [`iso`]: mesh suppliers for OBJ files and disc images.

pub mod engine;
pub mod iso;
pub mod math;
pub mod obj;
pub mod renderer;
pub mod world;
