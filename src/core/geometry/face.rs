use crate::core::Color;
use glam::Vec3;

/// A triangle referencing three entries of its mesh's vertex buffer.
///
/// Normal and centroid are derived once at construction; vertices never
/// move after load so they stay valid for the mesh's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: [u32; 3],
    pub normal: Vec3,
    pub centroid: Vec3,
    pub color: Color,
}

impl Face {
    /// Build a face from indices into `vert_buf`.
    ///
    /// Panics if an index is out of bounds; loaders validate indices first.
    pub fn new(indices: [u32; 3], vert_buf: &[Vec3], color: Color) -> Self {
        let v0 = vert_buf[indices[0] as usize];
        let v1 = vert_buf[indices[1] as usize];
        let v2 = vert_buf[indices[2] as usize];

        Self {
            indices,
            normal: face_normal(v0, v1, v2),
            centroid: face_centroid(v0, v1, v2),
            color,
        }
    }

    /// Recolor the face from its own normal.
    pub fn bake_normal_color(&mut self) {
        self.color = Color::from_normal(self.normal);
    }

    /// A zero area face has no usable normal.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }
}

/// `(v1 - v0) x (v2 - v0)` normalized, or zero for a degenerate triangle.
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    edge1.cross(edge2).normalize_or_zero()
}

pub fn face_centroid(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v0 + v1 + v2) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn tri() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 6.0, 0.0),
        ]
    }

    #[test]
    fn normal_is_unit_length() {
        let verts = vec![
            Vec3::new(1.5, -2.0, 7.25),
            Vec3::new(-4.0, 3.5, 0.5),
            Vec3::new(9.0, 1.0, -3.0),
        ];
        let face = Face::new([0, 1, 2], &verts, Color::TEAL);
        assert!((face.normal.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn normal_follows_winding() {
        let verts = tri();
        let ccw = Face::new([0, 1, 2], &verts, Color::TEAL);
        let cw = Face::new([0, 2, 1], &verts, Color::TEAL);
        assert!((ccw.normal - Vec3::Z).length() < EPS);
        assert!((cw.normal + Vec3::Z).length() < EPS);
    }

    #[test]
    fn degenerate_face_gets_zero_normal() {
        let verts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
        ];
        let face = Face::new([0, 1, 2], &verts, Color::TEAL);
        assert_eq!(face.normal, Vec3::ZERO);
        assert!(face.normal.is_finite());
        assert!(face.is_degenerate());

        let collapsed = Face::new([0, 0, 0], &verts, Color::TEAL);
        assert_eq!(collapsed.normal, Vec3::ZERO);
    }

    #[test]
    fn centroid_is_mean_in_any_order() {
        let verts = tri();
        let expected = Vec3::new(1.0, 2.0, 0.0);
        for order in [[0, 1, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let face = Face::new(order, &verts, Color::TEAL);
            assert_eq!(face.centroid, expected);
        }
    }

    #[test]
    fn baking_uses_normal_components() {
        let verts = tri();
        let mut face = Face::new([0, 2, 1], &verts, Color::TEAL);
        face.bake_normal_color();
        assert_eq!(face.color, Color::new(0, 0, 127));
    }
}
