use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use log::{info, warn};

use super::{obj, Face};
use crate::core::Color;
use crate::error::MeshError;

/// Shared vertex buffer plus the faces indexing into it.
///
/// Loaded once and never structurally mutated; per frame ordering happens
/// on a separate index list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>, // Negated model space positions
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Load a strictly triangular model with the native reader.
    pub fn from_obj(path: impl AsRef<Path>, base_color: Color) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mesh = obj::parse_obj(BufReader::new(file), base_color)?;
        info!(
            "loaded {:?}: {} vertices, {} faces",
            path,
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Load any Wavefront file through tobj, fan-splitting polygons into
    /// triangles.
    pub fn from_wavefront(path: impl AsRef<Path>, base_color: Color) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mesh = Self::from_wavefront_reader(&mut BufReader::new(file), base_color)?;
        info!(
            "imported {:?}: {} vertices, {} faces",
            path,
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    pub fn from_wavefront_reader<R: BufRead>(
        reader: &mut R,
        base_color: Color,
    ) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj_buf(
            reader,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ignore_points: true,
                ignore_lines: true,
                ..Default::default()
            },
            // Materials are never rendered, don't go looking for .mtl files
            |_| Err(tobj::LoadError::OpenFileFailed),
        )?;

        let mut vertices: Vec<Vec3> = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let mesh_data = model.mesh;
            let offset = vertices.len() as u32;

            for pos in mesh_data.positions.chunks_exact(3) {
                vertices.push(-Vec3::new(pos[0], pos[1], pos[2]));
            }

            for tri in mesh_data.indices.chunks_exact(3) {
                let indices = checked_indices(
                    [tri[0] + offset, tri[1] + offset, tri[2] + offset],
                    vertices.len(),
                )?;
                faces.push(Face::new(indices, &vertices, base_color));
            }

            if mesh_data.indices.len() % 3 != 0 {
                warn!(
                    "model {:?} has a trailing partial triangle, skipping it",
                    model.name
                );
            }
        }

        Ok(Self::new(vertices, faces))
    }

    /// Replace every face color with its normal shading color.
    pub fn bake_normals_to_colors(&mut self) {
        for face in &mut self.faces {
            face.bake_normal_color();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// tobj reports its own bad references; this guards the merged buffer.
fn checked_indices(indices: [u32; 3], vertex_count: usize) -> Result<[u32; 3], MeshError> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(MeshError::ImportIndexOutOfRange {
            index,
            vertex_count,
        }),
        None => Ok(indices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Mesh::from_obj("definitely/not/here.obj", Color::TEAL).unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
        assert!(err.to_string().starts_with("I/O error"));

        let err = Mesh::from_wavefront("definitely/not/here.obj", Color::TEAL).unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "flythrough_renderer_mesh_{}.obj",
            std::process::id()
        ));
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let mesh = Mesh::from_obj(&path, Color::TEAL);
        std::fs::remove_file(&path).ok();

        let mesh = mesh.unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.vertices[1], Vec3::new(-1.0, -0.0, -0.0));
    }

    #[test]
    fn wavefront_import_triangulates_quads() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = Mesh::from_wavefront_reader(&mut src.as_bytes(), Color::TEAL).unwrap();

        assert_eq!(mesh.faces.len(), 2);
        for face in &mesh.faces {
            // negating every vertex leaves the cross product unchanged
            assert!((face.normal - Vec3::Z).length() < 1e-5);
        }
    }

    #[test]
    fn import_index_errors_have_no_line_number() {
        let err = checked_indices([0, 1, 5], 3).unwrap_err();
        assert!(matches!(
            err,
            MeshError::ImportIndexOutOfRange {
                index: 5,
                vertex_count: 3
            }
        ));
        assert!(!err.to_string().contains("line"));
        assert_eq!(checked_indices([0, 1, 2], 3).unwrap(), [0, 1, 2]);

        let err = Mesh::from_wavefront_reader(&mut "v 0 0 0\nf 1 2 3\n".as_bytes(), Color::TEAL)
            .unwrap_err();
        assert!(!err.to_string().contains("line 0"));
    }

    #[test]
    fn bake_recolors_all_faces() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\n";
        let mut mesh = obj::parse_obj(src.as_bytes(), Color::TEAL).unwrap();
        assert!(mesh.faces.iter().all(|f| f.color == Color::TEAL));

        mesh.bake_normals_to_colors();
        assert_eq!(mesh.faces[0].color, Color::new(0, 0, 127));
        assert_eq!(mesh.faces[1].color, Color::new(127, 0, 0));
    }
}
