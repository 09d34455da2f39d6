use glam::IVec2;

use crate::core::Color;

pub mod buffer;
pub mod ordering;
pub mod pipeline;
pub mod projection;
pub mod rasterizer;

pub use buffer::{Buffer, FrameBuffer};
pub use ordering::DepthOrder;
pub use pipeline::{Pipeline, States};
pub use projection::{is_front_facing, Projector};

/// A visible face in integer screen coordinates, ready to fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedFace {
    pub points: [IVec2; 3],
    pub color: Color,
}

/// What one frame hands to the rasterizer: filled polygons in back to
/// front order, each optionally outlined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub faces: Vec<ProjectedFace>,
    pub outline: Option<Color>,
}

impl DrawList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            faces: Vec::with_capacity(capacity),
            outline: None,
        }
    }

    pub fn clear(&mut self) {
        self.faces.clear();
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Counts reported after each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Faces that survived culling and were drawn
    pub visible: usize,
    /// Faces in the mesh
    pub total: usize,
}
