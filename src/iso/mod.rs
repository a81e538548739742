//! Map meshes read straight from a sector-addressed game disc image.
//!
//! [`DiscImage::read_mesh`] walks a map's GNS table, decodes its texture
//! and mesh records and returns a ready-to-render [`crate::world::Mesh`].

pub mod gns;
pub mod image;
pub mod loader;

pub use gns::{GNS_SECTORS, GnsRecord, MapTime, MapWeather, RecordType};
pub use image::{DiscImage, IsoError, SECTOR_SIZE};
