use crate::core::{Camera, Face};

/// Painter's algorithm ordering, farthest face first.
///
/// Sorts a scratch list of `(distance, face index)` pairs so the mesh's own
/// face list is never reordered. The scratch allocation is reused across
/// frames.
#[derive(Debug, Default)]
pub struct DepthOrder {
    keyed: Vec<(f32, usize)>,
}

impl DepthOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Order `faces` by descending centroid distance from the camera.
    /// Ties come out in no particular order.
    pub fn sort(&mut self, faces: &[Face], camera: &Camera) -> &[(f32, usize)] {
        self.keyed.clear();
        self.keyed.extend(
            faces
                .iter()
                .enumerate()
                .map(|(i, face)| (camera.distance_to(face.centroid), i)),
        );
        self.keyed.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));
        &self.keyed
    }

    /// Face indices from the last [`sort`](Self::sort), back to front.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.keyed.iter().map(|&(_, i)| i)
    }
}
