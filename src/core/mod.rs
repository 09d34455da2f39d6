pub mod camera;
pub mod color;
pub mod geometry;
pub mod input;

pub use camera::{Camera, MAX_PITCH};
pub use color::Color;
pub use geometry::{Face, Mesh};
pub use input::{CameraController, InputState, MouseTracker};
