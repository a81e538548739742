// ──────────────────────────────────────────────────────────────────────────
// obj/parser.rs
//
//  *   `v`  positions                ──╮
//  *   `vt` texture coordinates        │   --->  world::mesh::Mesh
//  *   `vn` normals                    │          (fan-triangulated faces)
//  *   `f`  faces                    ──╯
// ──────────────────────────────────────────────────────────────────────────

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

use crate::{
    math::Vec3,
    world::{
        color::Color,
        mesh::{Mesh, MeshError, TriangleGeometry},
        texture::Tex,
    },
};

/*──────────────────────────── Error type ───────────────────────────*/

/// Parse failures carry the 1-based line they occurred on.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: malformed number `{token}`")]
    BadNumber { line: usize, token: String },

    #[error("line {line}: `{keyword}` needs {need} values, got {got}")]
    MissingValues {
        line: usize,
        keyword: &'static str,
        need: usize,
        got: usize,
    },

    #[error("line {line}: malformed face vertex `{token}`")]
    BadFaceVertex { line: usize, token: String },

    #[error("line {line}: face needs at least 3 vertices, got {count}")]
    FaceTooSmall { line: usize, count: usize },

    #[error("line {line}: {kind} index {index} out of range ({len} defined)")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
        len: usize,
    },

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Read an OBJ file; the mesh is named after the file stem.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map_or_else(|| "obj".to_string(), |s| s.to_string_lossy().into_owned());
    parse_obj(name, BufReader::new(File::open(path)?))
}

/// Parse OBJ text into a white, untextured mesh. Faces with more than
/// three corners are split into a fan around their first corner.
pub fn parse_obj<R: BufRead>(name: impl Into<String>, reader: R) -> Result<Mesh, ObjError> {
    let mut obj = ObjData::default();
    for (i, line) in reader.lines().enumerate() {
        obj.parse_line(i + 1, &line?)?;
    }

    let mesh = Mesh::new(name, obj.triangles);
    mesh.validate()?;
    info!(
        "obj '{}': {} vertices, {} texcoords, {} normals, {} triangles",
        mesh.name,
        obj.positions.len(),
        obj.texcoords.len(),
        obj.normals.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/*──────────────────────────── internals ────────────────────────────*/

#[derive(Clone, Copy, Debug)]
struct Corner {
    v: usize,
    vt: Option<usize>,
    vn: Option<usize>,
}

type Corners = SmallVec<[Corner; 4]>;

#[derive(Default)]
struct ObjData {
    positions: Vec<Vec3>,
    texcoords: Vec<Tex>,
    normals: Vec<Vec3>,
    triangles: Vec<TriangleGeometry>,
}

impl ObjData {
    fn parse_line(&mut self, line: usize, text: &str) -> Result<(), ObjError> {
        let text = text.split('#').next().unwrap_or_default();
        let mut tokens = text.split_whitespace();
        let Some(keyword) = tokens.next() else { return Ok(()) };

        match keyword {
            "v" => {
                let [x, y, z] = numbers(line, "v", tokens, 3)?;
                self.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = numbers(line, "vt", tokens, 1)?;
                // rows of a texture run top to bottom
                self.texcoords.push(Tex::new(u, 1.0 - v));
            }
            "vn" => {
                let [x, y, z] = numbers(line, "vn", tokens, 3)?;
                self.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let corners = tokens
                    .map(|t| self.corner(line, t))
                    .collect::<Result<Corners, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::FaceTooSmall { line, count: corners.len() });
                }
                for i in 1..corners.len() - 1 {
                    let tri = self.triangle([corners[0], corners[i], corners[i + 1]]);
                    self.triangles.push(tri);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `v`, `v/vt`, `v//vn` or `v/vt/vn`.
    fn corner(&self, line: usize, token: &str) -> Result<Corner, ObjError> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(-?\d+)(?:/(-?\d*)(?:/(-?\d*))?)?$").unwrap());

        let bad = || ObjError::BadFaceVertex { line, token: token.to_string() };
        let caps = RE.captures(token).ok_or_else(bad)?;
        let index = |group: usize| -> Result<Option<i64>, ObjError> {
            match caps.get(group).map(|m| m.as_str()) {
                None | Some("") => Ok(None),
                Some(s) => s.parse().map(Some).map_err(|_| bad()),
            }
        };

        let v = index(1)?.ok_or_else(bad)?;
        Ok(Corner {
            v: resolve(line, "vertex", v, self.positions.len())?,
            vt: index(2)?
                .map(|i| resolve(line, "texcoord", i, self.texcoords.len()))
                .transpose()?,
            vn: index(3)?
                .map(|i| resolve(line, "normal", i, self.normals.len()))
                .transpose()?,
        })
    }

    fn triangle(&self, c: [Corner; 3]) -> TriangleGeometry {
        let mut tri = TriangleGeometry::new(c.map(|c| self.positions[c.v]), Color::WHITE);
        if let [Some(a), Some(b), Some(d)] = c.map(|c| c.vt) {
            tri = tri.with_texcoords([self.texcoords[a], self.texcoords[b], self.texcoords[d]]);
        }
        if let [Some(a), Some(b), Some(d)] = c.map(|c| c.vn) {
            tri = tri.with_normals([self.normals[a], self.normals[b], self.normals[d]]);
        }
        tri
    }
}

/// 1-based index, or negative to count back from the newest element.
fn resolve(line: usize, kind: &'static str, index: i64, len: usize) -> Result<usize, ObjError> {
    let resolved = match index {
        i if i > 0 => Some(i as usize - 1),
        i if i < 0 => len.checked_sub(i.unsigned_abs() as usize),
        _ => None,
    };
    resolved
        .filter(|&i| i < len)
        .ok_or(ObjError::IndexOutOfRange { line, kind, index, len })
}

/// First `N` numbers of a statement; at least `need` must be present,
/// missing trailing ones are 0 and extra ones are ignored.
fn numbers<'a, const N: usize>(
    line: usize,
    keyword: &'static str,
    tokens: impl Iterator<Item = &'a str>,
    need: usize,
) -> Result<[f64; N], ObjError> {
    let mut out = [0.0; N];
    let mut got = 0;
    for token in tokens.take(N) {
        out[got] = token
            .parse()
            .map_err(|_| ObjError::BadNumber { line, token: token.to_string() })?;
        got += 1;
    }
    if got < need {
        return Err(ObjError::MissingValues { line, keyword, need, got });
    }
    Ok(out)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
