use glam::Vec3;

use crate::animation::{AnimationClip, AnimationMixer, MixerEvent};
use crate::assets::LoadedModel;
use crate::experience::journey::ClipPolicy;
use crate::scene::{NodeHandle, Scene};

/// Drives the avatar model's animation from a requested clip name.
///
/// Requesting a clip makes its action the sole running one, cross-fading
/// from the previous clip. When a one-shot clip ends while it is still the
/// requested one, its name is sent to every receiver obtained from
/// [`finished_clips`](Self::finished_clips).
pub struct AvatarController {
    root: NodeHandle,
    mixer: AnimationMixer,
    policy: ClipPolicy,
    fade_duration: f32,
    requested: Option<String>,
    finished_tx: flume::Sender<String>,
    finished_rx: flume::Receiver<String>,
}

impl AvatarController {
    /// Places the loaded model at `position` with a uniform `scale` and
    /// makes every one of its meshes cast shadows.
    pub fn new(
        scene: &mut Scene,
        model: LoadedModel,
        position: Vec3,
        scale: f32,
        policy: ClipPolicy,
        fade_duration: f32,
    ) -> Self {
        if let Some(root) = scene.get_node_mut(model.root) {
            root.transform.position = position;
            root.transform.scale = Vec3::splat(scale);
        }

        let mut mesh_count = 0;
        for handle in scene.descendants(model.root) {
            if let Some(mesh) = scene.meshes.get_mut(handle) {
                mesh.cast_shadow = true;
                mesh_count += 1;
            }
        }
        log::info!(
            "Avatar ready: {} clip(s), {mesh_count} mesh(es)",
            model.clips.len()
        );

        Self::from_clips(scene, model.root, model.clips, policy, fade_duration)
    }

    /// Wraps an already-built hierarchy rooted at `root`.
    pub fn from_clips(
        scene: &Scene,
        root: NodeHandle,
        clips: Vec<AnimationClip>,
        policy: ClipPolicy,
        fade_duration: f32,
    ) -> Self {
        let mut mixer = AnimationMixer::new(scene, root);
        for clip in clips {
            mixer.add_clip(clip);
        }
        let (finished_tx, finished_rx) = flume::unbounded();

        Self {
            root,
            mixer,
            policy,
            fade_duration,
            requested: None,
            finished_tx,
            finished_rx,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn requested_clip(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Receives the names of one-shot clips that finished while requested.
    #[must_use]
    pub fn finished_clips(&self) -> flume::Receiver<String> {
        self.finished_rx.clone()
    }

    /// Makes `clip` the running clip. Re-requesting the current clip does
    /// nothing; an unknown clip name is logged and otherwise ignored.
    pub fn request(&mut self, clip: &str, scene: &Scene) {
        if self.requested.as_deref() == Some(clip) {
            return;
        }
        self.requested = Some(clip.to_string());

        let Some(action) = self.mixer.clip_action(clip, scene) else {
            log::warn!("Avatar has no clip named '{clip}'; ignoring request");
            return;
        };

        let playback = self.policy.playback(clip);
        if self.mixer.transition_to(action, self.fade_duration, playback) {
            log::debug!("Avatar clip -> '{clip}' ({:?})", playback.loop_mode);
        }
    }

    /// Advances the mixer and forwards completion of the requested clip.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.mixer.update(dt, scene);

        let events: Vec<MixerEvent> = self.mixer.drain_events().collect();
        for MixerEvent::Finished { clip, .. } in events {
            if self.requested.as_deref() != Some(clip.as_str()) {
                continue;
            }
            log::debug!("One-shot clip '{clip}' finished");
            // The controller holds a receiver, so the channel is never disconnected.
            let _ = self.finished_tx.send(clip);
        }
    }
}
