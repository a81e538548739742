//! # Sector-addressed disc image
//!
//! * Thin wrapper over any `Read + Seek` source (a file, or a `Cursor` in
//!   tests).
//! * Addresses data by 2048-byte sector, optionally plus a byte offset
//!   taken from an intra-file pointer.
//! * Implements `Read`, so callers decode primitives straight off it with
//!   byteorder.

use std::{
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use thiserror::Error;

use crate::world::{mesh::MeshError, texture::TextureError};

/// Size of one disc sector in bytes.
pub const SECTOR_SIZE: u64 = 2048;

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum IsoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("map {0} out of range (0..{max})", max = super::gns::GNS_SECTORS.len())]
    MapOutOfRange(usize),

    #[error("map {0} does not exist on this disc")]
    MapUnavailable(usize),

    #[error("map {map}: GNS record {index}: {source}")]
    BadRecord {
        map: usize,
        index: usize,
        source: bincode::error::DecodeError,
    },

    #[error("mesh at sector {sector}: header element: {source}")]
    BadMeshHeader {
        sector: u64,
        source: bincode::error::DecodeError,
    },

    #[error("mesh at sector {sector}: primary mesh pointer is {found}, expected {expected}")]
    MissingMeshPointer { sector: u64, found: u64, expected: u64 },

    #[error("record at sector {sector} holds {len} bytes, need {need}")]
    ShortRecord { sector: u64, len: u64, need: u64 },

    #[error("map {0} contains no mesh")]
    NoMesh(usize),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Disc image opened for random access.
#[derive(Debug)]
pub struct DiscImage<R> {
    inner: R,
}

impl DiscImage<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IsoError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read + Seek> DiscImage<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Position at the first byte of `sector`.
    pub fn seek_sector(&mut self, sector: u64) -> Result<(), IsoError> {
        self.seek_pointer(sector, 0)
    }

    /// Position `ptr` bytes past the start of `sector`.
    pub fn seek_pointer(&mut self, sector: u64, ptr: u64) -> Result<(), IsoError> {
        self.inner.seek(SeekFrom::Start(sector * SECTOR_SIZE + ptr))?;
        Ok(())
    }

    /// Read exactly `len` bytes from the current position.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, IsoError> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read> Read for DiscImage<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

// ==========================================================================
// Tests
// ==========================================================================
