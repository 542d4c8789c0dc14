//! OBJ file loader for static meshes

use std::io::BufRead;

use thiserror::Error;

use crate::scene::MeshGeometry;

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed number or index
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// File parsed but holds no usable mesh
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Reads `v`, `vn` and `f` records into a [`MeshGeometry`]
///
/// Faces with more than three corners are fan-triangulated. Texture
/// coordinates, groups and materials are ignored.
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ text
    pub fn parse(reader: impl BufRead) -> Result<MeshGeometry, ObjError> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut mesh = MeshGeometry::default();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let number = number + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => positions.push(parse_vec3(parts, number, "vertex")?),
                Some("vn") => normals.push(parse_vec3(parts, number, "normal")?),
                Some("f") => {
                    let mut corners = Vec::new();
                    for corner in parts {
                        let mut refs = corner.split('/');
                        let position = parse_index(refs.next(), positions.len(), number)?;
                        let normal = refs
                            .nth(1)
                            .filter(|r| !r.is_empty())
                            .map(|r| parse_index(Some(r), normals.len(), number))
                            .transpose()?;

                        mesh.positions.push(positions[position]);
                        mesh.normals.push(normal.map_or([0.0, 1.0, 0.0], |n| normals[n]));
                        corners.push(index_u32(mesh.positions.len() - 1, number)?);
                    }

                    if corners.len() < 3 {
                        return Err(ObjError::ParseError {
                            line: number,
                            message: format!("face has {} corners", corners.len()),
                        });
                    }
                    for i in 1..corners.len() - 1 {
                        mesh.indices.extend([corners[0], corners[i], corners[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        if mesh.indices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ data".to_string()));
        }
        Ok(mesh)
    }
}

fn parse_vec3<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<[f32; 3], ObjError> {
    let mut out = [0.0; 3];
    for (axis, slot) in ["x", "y", "z"].iter().zip(&mut out) {
        *slot = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| ObjError::ParseError {
                line,
                message: format!("Invalid {what} {axis}"),
            })?;
    }
    Ok(out)
}

/// OBJ indices are 1-based; negative ones count back from the end
fn parse_index(raw: Option<&str>, len: usize, line: usize) -> Result<usize, ObjError> {
    let bad = |message: String| ObjError::ParseError { line, message };
    let raw = raw.unwrap_or_default();
    let value: i64 = raw.parse().map_err(|_| bad(format!("Invalid index '{raw}'")))?;

    let resolved = match value {
        0 => None,
        v if v > 0 => usize::try_from(v - 1).ok(),
        v => usize::try_from(-v).ok().and_then(|back| len.checked_sub(back)),
    };
    resolved
        .filter(|&i| i < len)
        .ok_or_else(|| bad(format!("Index {value} out of bounds ({len} entries)")))
}

fn index_u32(index: usize, line: usize) -> Result<u32, ObjError> {
    u32::try_from(index).map_err(|_| ObjError::ParseError {
        line,
        message: "mesh too large".to_string(),
    })
}
