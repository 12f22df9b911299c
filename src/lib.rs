//! # Journey
//!
//! An interactive 3D portfolio scene built on wgpu: an animated avatar in the
//! middle of the floor, one clickable marker per journey waypoint, a camera
//! that eases between the overview and the focused waypoint, overlay panels
//! with each waypoint's story and decorative cubes dropped by rapier physics.
//!
//! - [`experience`]: the scene logic ([`Experience`], [`Composer`], camera rig)
//! - [`animation`]: keyframe clips, actions and the cross-fading mixer
//! - [`scene`] / [`resources`]: scene graph, meshes, materials
//! - [`assets`]: glTF loading
//! - [`renderer`]: shadowed forward renderer plus the egui overlay
//! - [`app`]: winit runner and platform-agnostic input

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod errors;
pub mod experience;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use app::App;
pub use assets::{GltfLoader, LoadedModel};
pub use errors::{JourneyError, Result};
pub use experience::{Composer, Experience, Stage, Waypoint};
pub use renderer::{Renderer, WgpuContext};
pub use resources::primitives::*;
pub use resources::{Geometry, Image, Material, Mesh};
pub use scene::{Camera, Node, Scene};
pub use settings::Settings;
pub use utils::OrbitControls;
