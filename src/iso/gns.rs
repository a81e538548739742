//! GNS resource tables.
//!
//! Each map owns one table of 20-byte records, terminated by a record of
//! type [`RecordType::End`]. A record names the sector and length of one
//! resource (texture, mesh, ...) plus the time/weather it applies to.

use bincode::{Decode, config, decode_from_slice};
use log::debug;
use std::io::{Read, Seek};

use super::image::{DiscImage, IsoError};

/// On-disc size of one record.
pub const GNS_RECORD_LEN: usize = 20;

/// Start sector of the GNS table for MAP000..MAP125; 0 = no such map.
pub const GNS_SECTORS: [u64; 126] = [
    10026, 11304, 12656, 12938, 13570, 14239, 14751, 15030, 15595, 16262, // 000
    16347, 16852, 17343, 17627, 18175, 19510, 20075, 20162, 20745, 21411, // 010
    21692, 22270, 22938, 23282, 23557, 23899, 23988, 24266, 24544, 24822, // 020
    25099, 25764, 26042, 26229, 26362, 27028, 27643, 27793, 28467, 28555, // 030
    29165, 29311, 29653, 29807, 30473, 30622, 30966, 31697, 32365, 33032, // 040
    33701, 34349, 34440, 34566, 34647, 34745, 35350, 35436, 35519, 35603, // 050
    35683, 35765, 36052, 36394, 36530, 36612, 37214, 37817, 38386, 38473, // 060
    38622, 39288, 39826, 40120, 40724, 41391, 41865, 42532, 43200, 43295, // 070
    43901, 44569, 45044, 45164, 45829, 46498, 47167, 47260, 47928, 48595, // 080
    49260, 49538, 50108, 50387, 50554, 51120, 51416, 52082, 52749, 53414, // 090
    53502, 53579, 53659, 54273, 54359, 54528, 54621, 54716, 54812, 54909, // 100
    55004, 55097, 55192, 55286, 55383, 56051, 56123, 56201, 56279, 56356, // 110
    0, 0, 0, 0, 0, 56435, // 120
];

/// GNS table sector for `map`.
pub fn gns_sector(map: usize) -> Result<u64, IsoError> {
    match GNS_SECTORS.get(map) {
        None => Err(IsoError::MapOutOfRange(map)),
        Some(0) => Err(IsoError::MapUnavailable(map)),
        Some(&s) => Ok(s),
    }
}

/*=======================================================================*/
/*                         Raw binary struct                             */
/*=======================================================================*/

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawGnsRecord {
    /// Byte 3 carries the time bit (7) and weather (6..4).
    pub flags: [u8; 4],
    pub kind: u16,
    pub _pad0: u16,
    pub sector: u16,
    pub _pad1: u16,
    pub len: u32,
    pub _tail: [u8; 4],
}

/*=======================================================================*/
/*                           Decoded record                              */
/*=======================================================================*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordType {
    Texture,
    MeshPrimary,
    MeshOverride,
    MeshAlt,
    End,
    Other(u16),
}

impl From<u16> for RecordType {
    fn from(v: u16) -> Self {
        match v {
            0x1701 => Self::Texture,
            0x2E01 => Self::MeshPrimary,
            0x2F01 => Self::MeshOverride,
            0x3001 => Self::MeshAlt,
            0x3101 => Self::End,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapTime {
    Day,
    Night,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapWeather {
    None,
    NoneAlt,
    Normal,
    Strong,
    VeryStrong,
    Unknown(u8),
}

impl From<u8> for MapWeather {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::NoneAlt,
            2 => Self::Normal,
            3 => Self::Strong,
            4 => Self::VeryStrong,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GnsRecord {
    pub kind: RecordType,
    pub sector: u64,
    pub len: u64,
    pub time: MapTime,
    pub weather: MapWeather,
}

impl From<RawGnsRecord> for GnsRecord {
    fn from(raw: RawGnsRecord) -> Self {
        let b3 = raw.flags[3];
        Self {
            kind: raw.kind.into(),
            sector: raw.sector as u64,
            len: raw.len as u64,
            time: if b3 & 0x80 != 0 { MapTime::Night } else { MapTime::Day },
            weather: MapWeather::from((b3 >> 4) & 0x7),
        }
    }
}

/// Decode one 20-byte record.
pub fn decode_record(bytes: &[u8]) -> Result<GnsRecord, bincode::error::DecodeError> {
    let cfg = config::standard()
        .with_fixed_int_encoding()
        .with_little_endian();
    let (raw, _) = decode_from_slice::<RawGnsRecord, _>(bytes, cfg)?;
    Ok(raw.into())
}

impl<R: Read + Seek> DiscImage<R> {
    /// Every record of `map`'s table, up to (not including) the END record.
    pub fn read_gns_records(&mut self, map: usize) -> Result<Vec<GnsRecord>, IsoError> {
        let sector = gns_sector(map)?;
        self.seek_sector(sector)?;

        let mut records = Vec::new();
        loop {
            let bytes = self.read_bytes(GNS_RECORD_LEN)?;
            let record = decode_record(&bytes).map_err(|source| IsoError::BadRecord {
                map,
                index: records.len(),
                source,
            })?;
            if record.kind == RecordType::End {
                break;
            }
            debug!(
                "MAP{map:03} record {}: {:?} sector {} len {}",
                records.len(),
                record.kind,
                record.sector,
                record.len,
            );
            records.push(record);
        }
        Ok(records)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
