//! Per-frame orchestration: the geometry pipeline, frame pacing and the
//! [`Engine`] that ties mesh, camera and render options together.

pub mod clock;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod pipeline;
pub mod types;

pub use clock::FramePacer;
pub use engine::Engine;
pub use types::{FrameStats, ProjectedTriangle, RenderOptions, Viewport};
