// ──────────────────────────────────────────────────────────────────────────
// iso/loader.rs
//
//  *   GNS records (iso::gns)          ──╮
//  *   texture record (4 bpp)            │   --->  world::mesh::Mesh
//  *   mesh record (geometry, UVs,       │          + palettes, lighting,
//      palettes, lights, background)   ──╯            background, texture
// ──────────────────────────────────────────────────────────────────────────

use bincode::{Decode, config, decode_from_slice};
use byteorder::{ByteOrder, LittleEndian as LE, ReadBytesExt};
use log::{info, warn};
use std::io::{self, Read, Seek};

use super::{
    gns::{GnsRecord, RecordType},
    image::{DiscImage, IsoError},
};
use crate::{
    math::Vec3,
    world::{
        color::{Background, Color},
        light::{AmbientLight, DirectionalLight, Lighting},
        mesh::{Mesh, TriangleGeometry},
        texture::{PALETTE_LEN, Palette, Tex, Texture},
    },
};

/* map textures: 4 pages of 256x256, two texels per byte */
pub const TEXTURE_WIDTH: usize = 256;
pub const TEXTURE_HEIGHT: usize = 1024;
pub const TEXTURE_RAW_LEN: usize = TEXTURE_WIDTH * TEXTURE_HEIGHT / 2;

/// Colour palettes stored per mesh record.
pub const PALETTE_COUNT: usize = 16;

/* intra-file pointer table at the start of every mesh record */
const MESH_FILE_HEADER_LEN: usize = 196;
const PTR_PRIMARY_MESH: usize = 0x40;
const PTR_PALETTES: usize = 0x44;
const PTR_LIGHTS: usize = 0x64;

/*──────────────────────────── headers ──────────────────────────────*/

struct MeshFileHeader(Vec<u8>);

impl MeshFileHeader {
    fn ptr(&self, at: usize) -> u64 {
        LE::read_u32(&self.0[at..at + 4]) as u64
    }
}

/// Polygon counts: textured tris / quads, untextured tris / quads.
#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
struct RawMeshHeader {
    n: u16,
    p: u16,
    q: u16,
    r: u16,
}

impl RawMeshHeader {
    const LEN: usize = 8;

    /// Textured triangles once quads are split.
    fn textured(&self) -> usize {
        self.n as usize + 2 * self.p as usize
    }

    fn total(&self) -> usize {
        self.textured() + self.q as usize + 2 * self.r as usize
    }
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

impl<R: Read + Seek> DiscImage<R> {
    /// Decode `map` into a renderable mesh.
    ///
    /// The first texture record becomes the mesh texture. The primary mesh
    /// is used, or the alternate one when no primary has been seen.
    /// Coordinates are scaled into the unit cube and centred on the origin.
    pub fn read_mesh(&mut self, map: usize) -> Result<Mesh, IsoError> {
        let records = self.read_gns_records(map)?;

        let mut texture = None;
        let mut mesh: Option<Mesh> = None;
        for rec in &records {
            match rec.kind {
                RecordType::Texture if texture.is_none() => {
                    texture = Some(self.parse_texture(rec)?);
                }
                RecordType::MeshPrimary => mesh = Some(self.parse_mesh(rec)?),
                RecordType::MeshAlt if mesh.as_ref().is_none_or(|m| m.triangles.is_empty()) => {
                    warn!("MAP{map:03}: no primary mesh yet, using alternate at sector {}", rec.sector);
                    mesh = Some(self.parse_mesh(rec)?);
                }
                _ => {}
            }
        }

        let mut mesh = mesh.ok_or(IsoError::NoMesh(map))?;
        mesh.name = format!("MAP{map:03}");
        mesh.texture = texture;
        mesh.normalize_coordinates();
        mesh.center_coordinates();
        mesh.validate()?;

        info!(
            "{}: {} records, {} triangles, texture: {}",
            mesh.name,
            records.len(),
            mesh.triangles.len(),
            mesh.texture.is_some()
        );
        Ok(mesh)
    }

    /*──────────────────────── records ──────────────────────────────*/

    fn parse_texture(&mut self, rec: &GnsRecord) -> Result<Texture, IsoError> {
        if rec.len < TEXTURE_RAW_LEN as u64 {
            return Err(IsoError::ShortRecord {
                sector: rec.sector,
                len: rec.len,
                need: TEXTURE_RAW_LEN as u64,
            });
        }
        self.seek_sector(rec.sector)?;
        let raw = self.read_bytes(TEXTURE_RAW_LEN)?;
        let texture = Texture::indexed(TEXTURE_WIDTH, TEXTURE_HEIGHT, split_nibbles(&raw))?;
        Ok(texture.with_name(format!("sector {}", rec.sector)))
    }

    fn parse_mesh(&mut self, rec: &GnsRecord) -> Result<Mesh, IsoError> {
        let sector = rec.sector;
        self.seek_sector(sector)?;
        let file_header = MeshFileHeader(self.read_bytes(MESH_FILE_HEADER_LEN)?);

        // primary mesh data starts right after the pointer table
        let primary = file_header.ptr(PTR_PRIMARY_MESH);
        if rec.kind == RecordType::MeshPrimary && primary != MESH_FILE_HEADER_LEN as u64 {
            return Err(IsoError::MissingMeshPointer {
                sector,
                found: primary,
                expected: MESH_FILE_HEADER_LEN as u64,
            });
        }

        /*----- 1. palettes ---------------------------------------------*/
        self.seek_pointer(sector, file_header.ptr(PTR_PALETTES))?;
        let mut palettes = Vec::with_capacity(PALETTE_COUNT);
        for _ in 0..PALETTE_COUNT {
            let mut pal = Palette::default();
            for i in 0..PALETTE_LEN {
                pal[i] = read_rgb15(self)?;
            }
            palettes.push(pal);
        }

        /*----- 2. polygon counts ---------------------------------------*/
        self.seek_pointer(sector, primary)?;
        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let header_bytes = self.read_bytes(RawMeshHeader::LEN)?;
        let (header, _) = decode_from_slice::<RawMeshHeader, _>(&header_bytes, cfg)
            .map_err(|source| IsoError::BadMeshHeader { sector, source })?;

        /*----- 3. vertices ---------------------------------------------*/
        let mut triangles = Vec::with_capacity(header.total());
        for _ in 0..header.n {
            triangles.push(read_triangle(self)?);
        }
        for _ in 0..header.p {
            triangles.extend(read_quad(self)?);
        }
        for _ in 0..header.q {
            triangles.push(read_triangle(self)?);
        }
        for _ in 0..header.r {
            triangles.extend(read_quad(self)?);
        }

        /*----- 4. normals (unused, 3 x 1.3.12 per vertex) --------------*/
        let normal_bytes = (header.n as usize * 3 + header.p as usize * 4) * 6;
        self.read_bytes(normal_bytes)?;

        /*----- 5. texture coordinates + palette per textured polygon ---*/
        for tri in triangles.iter_mut().take(header.n as usize) {
            let (uv, palette) = read_tri_uv(self)?;
            tri.texcoords = Some(uv);
            tri.palette = Some(palette);
        }
        for pair in triangles[header.n as usize..header.textured()].chunks_exact_mut(2) {
            let (uvs, palette) = read_quad_uv(self)?;
            for (tri, uv) in pair.iter_mut().zip(uvs) {
                tri.texcoords = Some(uv);
                tri.palette = Some(palette);
            }
        }

        /*----- 6. lights + background ----------------------------------*/
        self.seek_pointer(sector, file_header.ptr(PTR_LIGHTS))?;
        let directional = read_directional_lights(self)?;
        let ambient = AmbientLight { color: read_rgb8(self)? };
        let background = Background::new(read_rgb8(self)?, read_rgb8(self)?);

        Ok(Mesh {
            triangles,
            palettes,
            lighting: Some(Lighting { directional, ambient }),
            background: Some(background),
            ..Mesh::default()
        })
    }
}

/// Two 4-bit palette indices per byte, low nibble first.
pub fn split_nibbles(raw: &[u8]) -> Vec<u8> {
    raw.iter().flat_map(|&b| [b & 0x0F, b >> 4]).collect()
}

/*──────────────────────── primitive readers ────────────────────────*/

/// Three i16; Y is flipped so that up is +Y.
fn read_vertex<R: Read>(r: &mut R) -> io::Result<Vec3> {
    let x = r.read_i16::<LE>()? as f64;
    let y = r.read_i16::<LE>()? as f64;
    let z = r.read_i16::<LE>()? as f64;
    Ok(Vec3::new(x, -y, z))
}

fn read_triangle<R: Read>(r: &mut R) -> io::Result<TriangleGeometry> {
    let (a, b, c) = (read_vertex(r)?, read_vertex(r)?, read_vertex(r)?);
    Ok(TriangleGeometry::new([a, b, c], Color::WHITE))
}

/// Quad `abcd` as triangles `abc` and `bdc`.
fn read_quad<R: Read>(r: &mut R) -> io::Result<[TriangleGeometry; 2]> {
    let (a, b, c, d) = (read_vertex(r)?, read_vertex(r)?, read_vertex(r)?, read_vertex(r)?);
    Ok([
        TriangleGeometry::new([a, b, c], Color::WHITE),
        TriangleGeometry::new([b, d, c], Color::WHITE),
    ])
}

/// Fixed point, 1 sign bit, 3 integer bits, 12 fraction bits.
fn read_f1x3x12<R: Read>(r: &mut R) -> io::Result<f64> {
    Ok(r.read_i16::<LE>()? as f64 / 4096.0)
}

fn read_uv<R: Read>(r: &mut R) -> io::Result<(u8, u8)> {
    Ok((r.read_u8()?, r.read_u8()?))
}

/// Texel coordinates on texture page `page`, normalised: U is 0..=255
/// across the page, V is 0..=1023 down the whole texture.
fn page_texcoord((u, v): (u8, u8), page: usize) -> Tex {
    let v = v as usize + page * 256;
    Tex::new(u as f64 / 255.0, v as f64 / 1023.0)
}

/// Raw `uv a, palette, pad, uv b, page, pad, uv c` block.
struct PolyUv {
    uv: [(u8, u8); 3],
    palette: usize,
    page: usize,
}

fn read_poly_uv<R: Read>(r: &mut R) -> io::Result<PolyUv> {
    let a = read_uv(r)?;
    let palette = (r.read_u8()? & 0x0F) as usize;
    r.read_u8()?;
    let b = read_uv(r)?;
    let page = (r.read_u8()? & 0x03) as usize;
    r.read_u8()?;
    let c = read_uv(r)?;
    Ok(PolyUv { uv: [a, b, c], palette, page })
}

fn read_tri_uv<R: Read>(r: &mut R) -> io::Result<([Tex; 3], usize)> {
    let poly = read_poly_uv(r)?;
    Ok((poly.uv.map(|uv| page_texcoord(uv, poly.page)), poly.palette))
}

/// Triangle block plus a trailing `uv d`; split like [`read_quad`].
fn read_quad_uv<R: Read>(r: &mut R) -> io::Result<([[Tex; 3]; 2], usize)> {
    let poly = read_poly_uv(r)?;
    let d = read_uv(r)?;
    let [a, b, c, d] = [poly.uv[0], poly.uv[1], poly.uv[2], d].map(|uv| page_texcoord(uv, poly.page));
    Ok(([[a, b, c], [b, d, c]], poly.palette))
}

fn read_rgb8<R: Read>(r: &mut R) -> io::Result<Color> {
    Ok(Color::new(r.read_u8()?, r.read_u8()?, r.read_u8()?))
}

/// 15-bit BGR; the value 0 is the transparent sentinel.
fn read_rgb15<R: Read>(r: &mut R) -> io::Result<Color> {
    let val = r.read_u16::<LE>()?;
    if val == 0 {
        return Ok(Color::TRANSPARENT);
    }
    let b = ((val & 0x7C00) >> 7) as u8;
    let g = ((val & 0x03E0) >> 2) as u8;
    let rr = ((val & 0x001F) << 3) as u8;
    Ok(Color::new(rr, g, b))
}

fn read_light_channel<R: Read>(r: &mut R) -> io::Result<u8> {
    Ok((255.0 * read_f1x3x12(r)?.clamp(0.0, 1.0)) as u8)
}

/// Channels are stored grouped: three reds, three greens, three blues,
/// then three light vectors pointing from the origin toward each light.
///
/// Each stored vector is taken as a light position shining toward the
/// map origin, and that one direction is used for every triangle.
fn read_directional_lights<R: Read>(r: &mut R) -> io::Result<Vec<DirectionalLight>> {
    let mut ch = [0u8; 9];
    for c in &mut ch {
        *c = read_light_channel(r)?;
    }
    let mut lights = Vec::with_capacity(3);
    for i in 0..3 {
        let color = Color::new(ch[i], ch[3 + i], ch[6 + i]);
        let position = read_vertex(r)?;
        lights.push(DirectionalLight::from_points(position, Vec3::ZERO, color));
    }
    Ok(lights)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
