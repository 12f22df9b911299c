//! Scene graph
//!
//! - [`Node`]: hierarchy + [`Transform`]
//! - [`Scene`]: node storage with mesh, camera and skin component maps
//! - [`Camera`]: perspective projection and pointer rays
//! - [`Skeleton`]: joint matrices for skinned meshes
//! - [`Environment`]: background, fog and the light rig

pub mod camera;
pub mod environment;
pub mod node;
pub mod ray;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod skeleton;
pub mod transform;

pub use camera::Camera;
pub use environment::{AmbientLight, DirectionalLight, Environment, Fog};
pub use node::Node;
pub use ray::Ray;
pub use scene::Scene;
pub use skeleton::{Skeleton, SkinBinding};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct SkeletonKey;
}
