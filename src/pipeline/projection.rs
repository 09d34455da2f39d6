use glam::{IVec2, Vec3};

use crate::core::{Camera, Face};
use crate::pipeline::ProjectedFace;

/// Perspective projection onto a `width` x `height` pixel grid.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    half_width: f32,
    half_height: f32,
    /// Vertices at or closer than this camera space depth reject their face
    near: f32,
}

impl Projector {
    pub fn new(width: usize, height: usize, near: f32) -> Self {
        Self {
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
            near,
        }
    }

    /// `((x / z) + 1) * half_extent`, truncated towards zero.
    pub fn project_vertex(&self, v: Vec3) -> IVec2 {
        let x = ((v.x / v.z) + 1.0) * self.half_width;
        let y = ((v.y / v.z) + 1.0) * self.half_height;
        // float to int casts saturate, huge off screen values stay ordered
        IVec2::new(x as i32, y as i32)
    }

    /// Transform and project every shared vertex once for this frame.
    ///
    /// Slot `i` of `out` holds vertex `i`'s pixel position, or `None` when it
    /// isn't strictly in front of the near plane. A NaN depth is never in
    /// front.
    pub fn project_vertices(
        &self,
        vertices: &[Vec3],
        camera: &Camera,
        out: &mut Vec<Option<IVec2>>,
    ) {
        let rotation = camera.view_rotation();
        out.clear();
        out.extend(vertices.iter().map(|&v| {
            let view = rotation * (v - camera.position);
            if view.z > self.near {
                Some(self.project_vertex(view))
            } else {
                None
            }
        }));
    }

    /// Cull one face against this frame's projected vertices.
    ///
    /// Returns `None` when the face points away from the camera or any of
    /// its vertices is not in front of the near plane. Faces are never
    /// split, a face crossing the near plane is dropped whole.
    pub fn project_face(
        &self,
        face: &Face,
        screen: &[Option<IVec2>],
        camera: &Camera,
    ) -> Option<ProjectedFace> {
        if !is_front_facing(face, camera) {
            return None;
        }

        let mut points = [IVec2::ZERO; 3];
        for (point, &index) in points.iter_mut().zip(face.indices.iter()) {
            *point = screen[index as usize]?;
        }

        Some(ProjectedFace {
            points,
            color: face.color,
        })
    }
}

/// Back-face test: the face survives when its normal has a positive
/// component along the camera to centroid direction.
///
/// Loaded vertices are negated, which mirrors the model while leaving the
/// cross product unchanged, so this keeps the faces whose file winding
/// faces the viewer. Zero normals never pass.
pub fn is_front_facing(face: &Face, camera: &Camera) -> bool {
    face.normal.dot(face.centroid - camera.position) > 0.0
}
