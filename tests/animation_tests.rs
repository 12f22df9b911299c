//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation and clamping
//! - KeyframeCursor agreement with stateless sampling
//! - AnimationClip duration
//! - AnimationAction loop modes, fades and finish behaviour
//! - AnimationMixer transitions, cross-fade blending and finish events

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

use glam::{Quat, Vec3};

use journey::animation::{
    ActionEvent, AnimationAction, AnimationClip, AnimationMixer, InterpolationMode,
    KeyframeCursor, KeyframeTrack, LoopMode, MixerEvent, Playback, TargetPath, Track, TrackData,
    TrackMeta,
};
use journey::scene::{Node, NodeHandle, Scene};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

/// A clip holding `value` on `node` for one second.
fn constant_clip(name: &str, node: &str, value: Vec3) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: node.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![value, value],
                InterpolationMode::Linear,
            )),
        }],
    )
}

fn one_second_action() -> AnimationAction {
    let clip = AnimationClip::new(
        "unit",
        vec![Track {
            meta: TrackMeta {
                node_name: "Bone".into(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::X],
                InterpolationMode::Linear,
            )),
        }],
    );
    AnimationAction::new(Arc::new(clip))
}

// ============================================================================
// KeyframeTrack: Interpolation
// ============================================================================

#[test]
fn track_linear_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);
    assert!(approx(track.sample(0.5), 5.0));
}

#[test]
fn track_clamps_outside_range() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![2.0_f32, 10.0], InterpolationMode::Linear);
    assert!(approx(track.sample(5.0), 10.0));
    assert!(approx(track.sample(-1.0), 2.0));
}

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![1.0_f32, 5.0, 9.0],
        InterpolationMode::Step,
    );
    assert!(approx(track.sample(0.99), 1.0));
    assert!(approx(track.sample(1.0), 5.0));
    assert!(approx(track.sample(1.7), 5.0));
}

#[test]
fn track_quaternion_slerps() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)],
        InterpolationMode::Linear,
    );
    let mid = track.sample(0.5);
    let expected = Quat::from_rotation_y(FRAC_PI_4);
    assert!(mid.dot(expected).abs() > 1.0 - EPSILON, "got {mid:?}");
}

#[test]
fn track_cubic_with_flat_tangents() {
    // [in_tangent, value, out_tangent] per keyframe
    let track = KeyframeTrack::new(
        vec![0.0, 10.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );
    assert!(approx(track.sample(0.0), 0.0));
    assert!(approx(track.sample(5.0), 5.0));
    assert!(approx(track.sample(10.0), 10.0));
    // Ease-in: slower than linear near the start.
    assert!(track.sample(1.0) < 1.0);
}

#[test]
fn cursor_matches_stateless_sampling() {
    let track = KeyframeTrack::new(
        vec![0.0, 0.5, 1.0, 2.0, 4.0],
        vec![0.0_f32, 3.0, -1.0, 8.0, 2.0],
        InterpolationMode::Linear,
    );
    let mut cursor = KeyframeCursor::default();

    let forward: Vec<f32> = (0..=45).map(|i| i as f32 * 0.1).collect();
    for &t in forward.iter().chain(forward.iter().rev()) {
        let a = track.sample_with_cursor(t, &mut cursor);
        let b = track.sample(t);
        assert!(approx(a, b), "t={t}: cursor {a} vs stateless {b}");
    }

    // A jump far back falls back to a search.
    assert!(approx(track.sample_with_cursor(0.25, &mut cursor), track.sample(0.25)));
}

#[test]
fn empty_track_samples_default() {
    let track: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert!(approx(track.sample(1.0), 0.0));
    assert!(approx(track.end_time(), 0.0));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_longest_track() {
    let short = Track {
        meta: TrackMeta {
            node_name: "A".into(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, 1.0],
            vec![Vec3::ZERO, Vec3::ONE],
            InterpolationMode::Linear,
        )),
    };
    let long = Track {
        meta: TrackMeta {
            node_name: "B".into(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, 2.5],
            vec![Quat::IDENTITY, Quat::IDENTITY],
            InterpolationMode::Linear,
        )),
    };
    let clip = AnimationClip::new("mixed", vec![short, long]);
    assert!(approx(clip.duration, 2.5));
}

// ============================================================================
// AnimationAction
// ============================================================================

#[test]
fn action_once_clamped_holds_last_pose() {
    let mut action = one_second_action();
    action.set_loop(LoopMode::Once).play();
    action.clamp_when_finished = true;

    assert_eq!(action.update(0.7), None);
    assert_eq!(action.update(0.7), Some(ActionEvent::Finished));
    assert!(approx(action.time, 1.0));
    assert!(action.is_finished());
    assert!(action.paused);
    assert!(action.contributes());
    assert!(!action.is_running());

    // Finished actions stay silent.
    assert_eq!(action.update(0.7), None);
}

#[test]
fn action_once_unclamped_releases_pose() {
    let mut action = one_second_action();
    action.set_loop(LoopMode::Once).play();

    assert_eq!(action.update(1.5), Some(ActionEvent::Finished));
    assert!(!action.enabled);
    assert!(!action.contributes());
}

#[test]
fn action_loop_wraps() {
    let mut action = one_second_action();
    action.set_loop(LoopMode::Loop).play();
    assert_eq!(action.update(1.25), None);
    assert!(approx(action.time, 0.25));
}

#[test]
fn action_ping_pong_reflects() {
    let mut action = one_second_action();
    action.set_loop(LoopMode::PingPong).play();
    action.update(1.5);
    assert!(approx(action.time, 0.5));
}

#[test]
fn action_does_not_advance_until_played() {
    let mut action = one_second_action();
    action.update(0.5);
    assert!(approx(action.time, 0.0));
    assert!(!action.is_playing());
}

#[test]
fn action_fade_in_ramps_weight() {
    let mut action = one_second_action();
    action.play().fade_in(1.0);
    assert!(approx(action.weight(), 0.0));

    action.update(0.25);
    assert!(approx(action.weight(), 0.25));
    assert!(action.is_running());
}

#[test]
fn action_fade_out_stops_playback() {
    let mut action = one_second_action();
    action.play().fade_out(0.5);
    assert!(action.is_fading_out());
    assert!(!action.is_running());

    action.update(0.3);
    assert!(action.weight() > 0.0 && action.weight() < 1.0);
    assert!(action.is_playing());

    action.update(0.3);
    assert!(approx(action.weight(), 0.0));
    assert!(!action.is_playing());
}

#[test]
fn action_fade_out_before_any_weight() {
    let mut action = one_second_action();
    action.play().fade_in(1.0);
    action.fade_out(0.5);
    assert!(approx(action.weight(), 0.0));
    assert!(action.is_fading_out());
    assert!(!action.is_running());

    action.update(0.6);
    assert!(!action.is_playing());
}

#[test]
fn action_instant_fade_out_stops_immediately() {
    let mut action = one_second_action();
    action.play().fade_out(0.0);
    assert!(!action.is_playing());
    assert!(approx(action.weight(), 0.0));
}

#[test]
fn action_reset_rewinds() {
    let mut action = one_second_action();
    action.set_loop(LoopMode::Once).play();
    action.update(2.0);
    assert!(action.is_finished());

    action.reset();
    assert!(approx(action.time, 0.0));
    assert!(!action.is_finished());
    assert!(action.enabled);
}

// ============================================================================
// AnimationMixer
// ============================================================================

const REST: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const A: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const B: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const INTRO: Vec3 = Vec3::new(0.0, 2.0, 0.0);

struct Rig {
    scene: Scene,
    bone: NodeHandle,
    mixer: AnimationMixer,
}

fn rig() -> Rig {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Avatar"));
    let mut bone = Node::new("Bone");
    bone.transform.position = REST;
    let bone = scene.add_to_parent(bone, root);

    let mut mixer = AnimationMixer::new(&scene, root);
    mixer.add_clip(constant_clip("a", "Bone", A));
    mixer.add_clip(constant_clip("b", "Bone", B));
    mixer.add_clip(constant_clip("intro", "Bone", INTRO));

    Rig { scene, bone, mixer }
}

impl Rig {
    fn bone_position(&self) -> Vec3 {
        self.scene.get_node(self.bone).unwrap().transform.position
    }

    fn play(&mut self, clip: &str, fade: f32, playback: Playback) -> bool {
        let key = self.mixer.clip_action(clip, &self.scene).unwrap();
        self.mixer.transition_to(key, fade, playback)
    }

    fn update(&mut self, dt: f32) {
        self.mixer.update(dt, &mut self.scene);
    }
}

#[test]
fn mixer_creates_actions_lazily() {
    let mut rig = rig();
    assert!(rig.mixer.has_clip("a"));
    assert_eq!(rig.mixer.action_count(), 0);

    let first = rig.mixer.clip_action("a", &rig.scene).unwrap();
    let again = rig.mixer.clip_action("a", &rig.scene).unwrap();
    assert_eq!(first, again);
    assert_eq!(rig.mixer.action_count(), 1);

    assert!(rig.mixer.clip_action("missing", &rig.scene).is_none());
    assert_eq!(rig.mixer.action_count(), 1);
}

#[test]
fn mixer_instant_transition_writes_pose() {
    let mut rig = rig();
    assert!(rig.play("a", 0.0, Playback::LOOP));
    rig.update(0.1);

    assert!(approx_vec3(rig.bone_position(), A));
    assert_eq!(rig.mixer.current_clip(), Some("a"));
}

#[test]
fn mixer_repeat_transition_is_noop() {
    let mut rig = rig();
    assert!(rig.play("a", 0.5, Playback::LOOP));
    rig.update(0.1);
    assert!(!rig.play("a", 0.5, Playback::LOOP));

    let key = rig.mixer.current_action().unwrap();
    assert!(rig.mixer.action(key).unwrap().is_running());
}

#[test]
fn mixer_cross_fade_blends_both_clips() {
    let mut rig = rig();
    rig.play("a", 0.0, Playback::LOOP);
    rig.update(0.1);

    rig.play("b", 1.0, Playback::LOOP);
    rig.update(0.5);
    assert!(
        approx_vec3(rig.bone_position(), Vec3::new(0.5, 0.0, 0.5)),
        "got {:?}",
        rig.bone_position()
    );

    rig.update(0.6);
    assert!(approx_vec3(rig.bone_position(), B));

    let a = rig.mixer.clip_action("a", &rig.scene).unwrap();
    assert!(!rig.mixer.action(a).unwrap().is_playing());
}

#[test]
fn mixer_partial_weight_fills_with_rest_pose() {
    let mut rig = rig();
    rig.play("a", 1.0, Playback::LOOP);
    rig.update(0.25);
    assert!(
        approx_vec3(rig.bone_position(), Vec3::new(0.25, 0.75, 0.0)),
        "got {:?}",
        rig.bone_position()
    );
}

#[test]
fn mixer_runs_at_most_one_action() {
    let mut rig = rig();
    let sequence = [
        ("intro", Playback::ONCE_CLAMPED),
        ("a", Playback::LOOP),
        ("b", Playback::LOOP),
        ("a", Playback::LOOP),
        ("a", Playback::LOOP),
        ("intro", Playback::ONCE_CLAMPED),
        ("b", Playback::LOOP),
    ];

    for (clip, playback) in sequence {
        rig.play(clip, 0.5, playback);
        assert!(rig.mixer.running_actions().count() <= 1);
        for _ in 0..5 {
            rig.update(0.1);
            assert!(rig.mixer.running_actions().count() <= 1);
        }
    }
}

#[test]
fn mixer_back_to_back_transitions_leave_one_running() {
    let mut rig = rig();
    rig.play("a", 0.5, Playback::LOOP);
    // No update in between: "a" has not gained any weight yet.
    rig.play("b", 0.5, Playback::LOOP);

    let a = rig.mixer.clip_action("a", &rig.scene).unwrap();
    assert!(rig.mixer.action(a).unwrap().is_fading_out());
    assert_eq!(rig.mixer.running_actions().count(), 1);
    assert_eq!(rig.mixer.current_clip(), Some("b"));

    for _ in 0..20 {
        rig.update(0.1);
        assert_eq!(rig.mixer.running_actions().count(), 1);
    }
    assert!(!rig.mixer.action(a).unwrap().is_playing());
    assert!(approx_vec3(rig.bone_position(), B));
}

#[test]
fn mixer_reports_one_shot_finish_once() {
    let mut rig = rig();
    rig.play("intro", 0.0, Playback::ONCE_CLAMPED);

    rig.update(0.6);
    assert_eq!(rig.mixer.drain_events().count(), 0);

    rig.update(0.6);
    let events: Vec<MixerEvent> = rig.mixer.drain_events().collect();
    assert_eq!(events.len(), 1);
    let MixerEvent::Finished { clip, .. } = &events[0];
    assert_eq!(clip, "intro");

    for _ in 0..10 {
        rig.update(0.6);
    }
    assert_eq!(rig.mixer.drain_events().count(), 0);
    // Clamped: the final pose is held.
    assert!(approx_vec3(rig.bone_position(), INTRO));
}

#[test]
fn mixer_looping_clip_never_finishes() {
    let mut rig = rig();
    rig.play("a", 0.0, Playback::LOOP);
    for _ in 0..30 {
        rig.update(0.25);
    }
    assert_eq!(rig.mixer.drain_events().count(), 0);
}

#[test]
fn mixer_stop_all_restores_rest_pose() {
    let mut rig = rig();
    rig.play("a", 0.0, Playback::LOOP);
    rig.update(0.1);
    assert!(approx_vec3(rig.bone_position(), A));

    rig.mixer.stop_all();
    rig.update(0.1);
    assert!(approx_vec3(rig.bone_position(), REST));
    assert!(rig.mixer.current_action().is_none());
}
