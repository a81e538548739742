//! Wavefront OBJ meshes.

pub mod parser;

pub use parser::{ObjError, load_obj, parse_obj};
