//! CPU-side render resources: geometry, materials, images and the
//! procedural shapes the scene is built from.

pub mod geometry;
pub mod image;
pub mod material;
pub mod mesh;
pub mod primitives;

pub use geometry::{BoundingBox, Geometry, SkinAttributes, Vertex};
pub use image::Image;
pub use material::Material;
pub use mesh::Mesh;
