use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node under `root` by name.
    ///
    /// Tracks whose node cannot be found are skipped and logged once.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());
        let mut missing = 0usize;

        for (track_index, track) in clip.tracks.iter().enumerate() {
            match scene.find_node_by_name(root, &track.meta.node_name) {
                Some(node_handle) => bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                }),
                None => missing += 1,
            }
        }

        if missing > 0 {
            log::warn!(
                "Clip '{}': {missing} of {} tracks target nodes missing from the model",
                clip.name,
                clip.tracks.len()
            );
        }

        bindings
    }
}
