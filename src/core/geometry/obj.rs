//! Line oriented reader for the flat `v` / `f` model format.
//!
//! Only `v` and `f` lines matter; everything else is skipped. Vertices are
//! negated as they are read, which is the coordinate flip the rest of the
//! pipeline expects.

use std::io::{self, BufRead};

use glam::Vec3;
use log::{debug, trace};

use crate::core::geometry::{Face, Mesh};
use crate::core::Color;
use crate::error::MeshError;

/// A face as written in the file, before indices are resolved.
struct RawFace {
    line: usize,
    refs: [i64; 3],
}

/// Parse a whole model from `reader`.
///
/// Faces are resolved after every vertex has been read, so a face may
/// reference a vertex that appears later in the file.
pub fn parse_obj<R: BufRead>(reader: R, base_color: Color) -> Result<Mesh, MeshError> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut raw_faces: Vec<RawFace> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| read_error(line_no, e))?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => vertices.push(-parse_vertex(line_no, tokens)?),
            Some("f") => raw_faces.push(parse_face(line_no, tokens)?),
            _ => {}
        }
    }

    debug!(
        "read {} vertices and {} faces",
        vertices.len(),
        raw_faces.len()
    );

    let mut faces = Vec::with_capacity(raw_faces.len());
    for raw in &raw_faces {
        let indices = resolve(raw, vertices.len())?;
        faces.push(Face::new(indices, &vertices, base_color));
    }

    Ok(Mesh::new(vertices, faces))
}

/// Bad UTF-8 is malformed input, anything else is a failing reader.
fn read_error(line: usize, err: io::Error) -> MeshError {
    if err.kind() == io::ErrorKind::InvalidData {
        MeshError::parse(line, format!("unreadable line: {err}"))
    } else {
        MeshError::Read { line, source: err }
    }
}

fn parse_vertex<'a>(
    line: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<Vec3, MeshError> {
    let mut pos = [0.0f32; 3];
    for (axis, slot) in ["x", "y", "z"].iter().zip(pos.iter_mut()) {
        let token = tokens
            .next()
            .ok_or_else(|| MeshError::parse(line, format!("vertex is missing its {axis} coordinate")))?;
        *slot = token.parse::<f32>().map_err(|_| {
            MeshError::parse(line, format!("invalid {axis} coordinate {token:?}"))
        })?;
    }
    // an optional `w` component is ignored
    trace!("line {line}: vertex {pos:?}");
    Ok(Vec3::from_array(pos))
}

fn parse_face<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
) -> Result<RawFace, MeshError> {
    let refs = tokens
        .map(|token| parse_vertex_ref(line, token))
        .collect::<Result<Vec<_>, _>>()?;

    let refs: [i64; 3] = refs.as_slice().try_into().map_err(|_| {
        MeshError::parse(
            line,
            format!(
                "face has {} vertices, only triangles are supported (try --triangulate)",
                refs.len()
            ),
        )
    })?;

    Ok(RawFace { line, refs })
}

/// `v`, `v/vt`, `v//vn` and `v/vt/vn` all resolve to `v`.
fn parse_vertex_ref(line: usize, token: &str) -> Result<i64, MeshError> {
    let first = token.split('/').next().unwrap_or_default();
    first
        .parse::<i64>()
        .map_err(|_| MeshError::parse(line, format!("invalid vertex reference {token:?}")))
}

/// Turn 1-based file indices into 0-based buffer indices.
fn resolve(raw: &RawFace, vertex_count: usize) -> Result<[u32; 3], MeshError> {
    let mut indices = [0u32; 3];
    for (slot, &index) in indices.iter_mut().zip(raw.refs.iter()) {
        if index < 1 || index as u64 > vertex_count as u64 || index > u32::MAX as i64 {
            return Err(MeshError::IndexOutOfRange {
                line: raw.line,
                index,
                vertex_count,
            });
        }
        *slot = (index - 1) as u32;
    }
    Ok(indices)
}
