mod face;
mod mesh;
pub mod obj;

pub use face::{face_centroid, face_normal, Face};
pub use mesh::Mesh;
