//! Keyframe animation
//!
//! Clips hold named tracks; the [`Binder`] resolves them against a model's
//! node hierarchy; [`AnimationAction`]s carry per-clip playback state; the
//! [`AnimationMixer`] owns the actions of one model, cross-fades between
//! them and writes the blended pose into the scene.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{ActionEvent, AnimationAction, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionKey, AnimationMixer, MixerEvent, Playback};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
