use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::{ActionEvent, AnimationAction, LoopMode, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene, Transform};

new_key_type! {
    pub struct ActionKey;
}

/// How a clip plays once it becomes the current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub loop_mode: LoopMode,
    pub clamp_when_finished: bool,
}

impl Playback {
    /// Repeat forever.
    pub const LOOP: Self = Self {
        loop_mode: LoopMode::Loop,
        clamp_when_finished: false,
    };

    /// Play once and hold the final pose.
    pub const ONCE_CLAMPED: Self = Self {
        loop_mode: LoopMode::Once,
        clamp_when_finished: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerEvent {
    /// A one-shot action reached the end of its clip.
    Finished { action: ActionKey, clip: String },
}

type TargetKey = (NodeHandle, TargetPath);

/// Weighted sum of the samples written to one target this frame.
#[derive(Debug, Clone, Copy)]
enum Accumulator {
    Vector3 { sum: Vec3, weight: f32 },
    Quaternion { value: Quat, weight: f32 },
}

impl Accumulator {
    fn start(value: TrackValue, weight: f32) -> Self {
        match value {
            TrackValue::Vector3(v) => Self::Vector3 { sum: v * weight, weight },
            TrackValue::Quaternion(q) => Self::Quaternion { value: q, weight },
        }
    }

    fn add(&mut self, sample: TrackValue, w: f32) {
        match (self, sample) {
            (Self::Vector3 { sum, weight }, TrackValue::Vector3(v)) => {
                *sum += v * w;
                *weight += w;
            }
            (Self::Quaternion { value, weight }, TrackValue::Quaternion(q)) => {
                *weight += w;
                *value = value.slerp(q, w / *weight);
            }
            _ => {}
        }
    }

    /// Resolves the blend, filling any missing weight with the rest pose.
    fn resolve(self, rest: TrackValue) -> TrackValue {
        match (self, rest) {
            (Self::Vector3 { sum, weight }, TrackValue::Vector3(rest)) => {
                if weight >= 1.0 {
                    TrackValue::Vector3(sum / weight)
                } else {
                    TrackValue::Vector3(sum + rest * (1.0 - weight))
                }
            }
            (Self::Quaternion { value, weight }, TrackValue::Quaternion(rest)) => {
                if weight >= 1.0 {
                    TrackValue::Quaternion(value)
                } else {
                    TrackValue::Quaternion(rest.slerp(value, weight))
                }
            }
            (Self::Vector3 { sum, weight }, _) => TrackValue::Vector3(sum / weight.max(1e-6)),
            (Self::Quaternion { value, .. }, _) => TrackValue::Quaternion(value),
        }
    }
}

fn read_target(transform: &Transform, path: TargetPath) -> TrackValue {
    match path {
        TargetPath::Translation => TrackValue::Vector3(transform.position),
        TargetPath::Rotation => TrackValue::Quaternion(transform.rotation),
        TargetPath::Scale => TrackValue::Vector3(transform.scale),
    }
}

fn write_target(transform: &mut Transform, path: TargetPath, value: TrackValue) {
    match (path, value) {
        (TargetPath::Translation, TrackValue::Vector3(v)) => transform.position = v,
        (TargetPath::Scale, TrackValue::Vector3(v)) => transform.scale = v,
        (TargetPath::Rotation, TrackValue::Quaternion(q)) => transform.rotation = q,
        _ => {}
    }
}

/// Plays and blends the clips of one model.
///
/// Actions are created lazily, once per clip name, and kept for the mixer's
/// lifetime. The mixer tracks the current action explicitly:
/// [`transition_to`](Self::transition_to) fades the current action out and
/// the requested one in, so at most one action is ever running. Targets that
/// receive less than full weight (mid cross-fade) are completed with the
/// model's rest pose, captured when the mixer is created.
pub struct AnimationMixer {
    root: NodeHandle,
    clips: FxHashMap<String, Arc<AnimationClip>>,
    actions: SlotMap<ActionKey, AnimationAction>,
    actions_by_clip: FxHashMap<String, ActionKey>,
    current: Option<ActionKey>,

    rest_pose: FxHashMap<TargetKey, TrackValue>,
    bound_targets: FxHashSet<TargetKey>,
    blend: FxHashMap<TargetKey, Accumulator>,

    events: Vec<MixerEvent>,
}

impl AnimationMixer {
    /// Creates a mixer for the model rooted at `root`, snapshotting the
    /// subtree's current pose as the rest pose.
    #[must_use]
    pub fn new(scene: &Scene, root: NodeHandle) -> Self {
        let mut rest_pose = FxHashMap::default();
        for handle in scene.descendants(root) {
            let Some(node) = scene.get_node(handle) else {
                continue;
            };
            for path in [TargetPath::Translation, TargetPath::Rotation, TargetPath::Scale] {
                rest_pose.insert((handle, path), read_target(&node.transform, path));
            }
        }

        Self {
            root,
            clips: FxHashMap::default(),
            actions: SlotMap::with_key(),
            actions_by_clip: FxHashMap::default(),
            current: None,
            rest_pose,
            bound_targets: FxHashSet::default(),
            blend: FxHashMap::default(),
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Clips & actions
    // ========================================================================

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), Arc::new(clip));
    }

    #[must_use]
    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// The action playing clip `name`, created and bound on first use.
    ///
    /// `None` if the model has no such clip.
    pub fn clip_action(&mut self, name: &str, scene: &Scene) -> Option<ActionKey> {
        if let Some(&key) = self.actions_by_clip.get(name) {
            return Some(key);
        }

        let clip = self.clips.get(name)?.clone();
        let mut action = AnimationAction::new(clip.clone());
        action.bindings = Binder::bind(scene, self.root, &clip);
        for binding in &action.bindings {
            let target = (binding.node_handle, binding.target);
            self.bound_targets.insert(target);
            if !self.rest_pose.contains_key(&target)
                && let Some(node) = scene.get_node(binding.node_handle)
            {
                self.rest_pose.insert(target, read_target(&node.transform, binding.target));
            }
        }

        let key = self.actions.insert(action);
        self.actions_by_clip.insert(name.to_string(), key);
        log::debug!("Created action for clip '{name}'");
        Some(key)
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    /// Number of actions created so far.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn current_action(&self) -> Option<ActionKey> {
        self.current
    }

    #[must_use]
    pub fn current_clip(&self) -> Option<&str> {
        let action = self.actions.get(self.current?)?;
        Some(action.clip().name.as_str())
    }

    /// Actions currently playing forward and not fading out.
    pub fn running_actions(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.actions
            .iter()
            .filter(|(_, a)| a.is_running())
            .map(|(k, _)| k)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Makes `target` the sole running action.
    ///
    /// If `target` is already running nothing happens. Otherwise the current
    /// action fades out over `fade` seconds while `target` is rewound,
    /// configured with `playback`, and faded in over the same window.
    /// Returns whether a transition started.
    pub fn transition_to(&mut self, target: ActionKey, fade: f32, playback: Playback) -> bool {
        let Some(target_action) = self.actions.get(target) else {
            return false;
        };
        if self.current == Some(target) && target_action.is_running() {
            return false;
        }

        // The outgoing action may not have gained any weight yet.
        if let Some(prev) = self
            .current
            .filter(|&k| k != target)
            .and_then(|k| self.actions.get_mut(k))
            && prev.is_playing()
            && !prev.is_fading_out()
        {
            prev.fade_out(fade);
        }

        if let Some(action) = self.actions.get_mut(target) {
            action.reset().set_loop(playback.loop_mode);
            action.clamp_when_finished = playback.clamp_when_finished;
            action.fade_in(fade).play();
        }
        self.current = Some(target);
        true
    }

    /// Stops every action and forgets the current one.
    pub fn stop_all(&mut self) {
        for (_, action) in &mut self.actions {
            action.stop();
        }
        self.current = None;
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Advances all actions by `dt`, blends their poses and writes the result
    /// into the scene's node transforms.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for (key, action) in &mut self.actions {
            if let Some(ActionEvent::Finished) = action.update(dt) {
                self.events.push(MixerEvent::Finished {
                    action: key,
                    clip: action.clip().name.clone(),
                });
            }
        }

        self.blend.clear();
        for (_, action) in &mut self.actions {
            if !action.contributes() {
                continue;
            }
            let weight = action.weight();
            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(sample) = action.sample_track(binding.track_index) else {
                    continue;
                };
                self.blend
                    .entry((binding.node_handle, binding.target))
                    .and_modify(|acc| acc.add(sample, weight))
                    .or_insert_with(|| Accumulator::start(sample, weight));
            }
        }

        for &target in &self.bound_targets {
            let Some(&rest) = self.rest_pose.get(&target) else {
                continue;
            };
            let value = match self.blend.get(&target) {
                Some(acc) => acc.resolve(rest),
                None => rest,
            };
            if let Some(node) = scene.get_node_mut(target.0) {
                write_target(&mut node.transform, target.1, value);
            }
        }
    }

    /// Events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, MixerEvent> {
        self.events.drain(..)
    }
}
