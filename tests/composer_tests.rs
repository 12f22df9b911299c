//! Scene Composer Tests
//!
//! Tests for:
//! - Intro -> Overview on the intro clip finishing, exactly once
//! - Overview <-> Focused(k) on marker clicks and the close control
//! - Focused(k) -> Focused(j) without passing through Overview
//! - Out-of-range clicks and stray close clicks
//! - ClipPolicy lookups

use journey::animation::{LoopMode, Playback};
use journey::experience::{
    ClipPolicy, Composer, HERO_DROP_CLIP, IDLE_CLIP, Stage, Waypoint, default_journey,
};

fn composer() -> Composer {
    Composer::new(default_journey(), IDLE_CLIP, HERO_DROP_CLIP)
}

fn overview() -> Composer {
    let mut c = composer();
    assert!(c.on_clip_finished(HERO_DROP_CLIP));
    c
}

// ============================================================================
// Intro
// ============================================================================

#[test]
fn starts_in_intro_with_hero_drop() {
    let c = composer();
    assert_eq!(c.stage(), Stage::Intro);
    assert_eq!(c.requested_clip(), HERO_DROP_CLIP);
    assert!(c.active_waypoint().is_none());
    assert!(!c.state().intro_complete());
}

#[test]
fn intro_finish_moves_to_overview_once() {
    let mut c = composer();
    assert!(c.on_clip_finished(HERO_DROP_CLIP));
    assert_eq!(c.stage(), Stage::Overview);
    assert_eq!(c.requested_clip(), IDLE_CLIP);
    assert!(c.state().intro_complete());

    c.click(2);
    assert!(!c.on_clip_finished(HERO_DROP_CLIP));
    assert_eq!(c.stage(), Stage::Focused(2));
}

#[test]
fn other_finished_clips_do_not_end_intro() {
    let mut c = composer();
    assert!(!c.on_clip_finished("akash-fight-quest"));
    assert_eq!(c.stage(), Stage::Intro);
}

#[test]
fn click_during_intro_focuses_and_ends_intro() {
    let mut c = composer();
    c.click(1);
    assert_eq!(c.stage(), Stage::Focused(1));
    assert!(c.state().intro_complete());

    // The late intro signal must not yank the user back to the overview.
    assert!(!c.on_clip_finished(HERO_DROP_CLIP));
    assert_eq!(c.stage(), Stage::Focused(1));
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn click_from_overview_focuses_every_waypoint() {
    for (k, waypoint) in default_journey().iter().enumerate() {
        let mut c = overview();
        c.click(k);
        assert_eq!(c.stage(), Stage::Focused(k));
        assert_eq!(c.requested_clip(), waypoint.clip);
        assert_eq!(c.active_waypoint(), Some(waypoint));
        assert_eq!(c.state().active_waypoint(), Some(k));
    }
}

#[test]
fn second_click_returns_to_overview() {
    for k in 0..default_journey().len() {
        let mut c = overview();
        c.click(k);
        c.click(k);
        assert_eq!(c.stage(), Stage::Overview);
        assert_eq!(c.requested_clip(), IDLE_CLIP);
        assert!(c.active_waypoint().is_none());
    }
}

#[test]
fn close_control_returns_to_overview() {
    for k in 0..default_journey().len() {
        let mut c = overview();
        c.click(k);
        c.close(k);
        assert_eq!(c.stage(), Stage::Overview);
        assert_eq!(c.requested_clip(), IDLE_CLIP);
    }
}

#[test]
fn close_on_inactive_marker_is_ignored() {
    let mut c = overview();
    c.close(0);
    assert_eq!(c.stage(), Stage::Overview);

    c.click(3);
    c.close(1);
    assert_eq!(c.stage(), Stage::Focused(3));
    assert_eq!(c.requested_clip(), "akash-fight-quest");
}

#[test]
fn click_other_marker_switches_directly() {
    let journey = default_journey();
    for k in 0..journey.len() {
        for j in (0..journey.len()).filter(|&j| j != k) {
            let mut c = overview();
            c.click(k);
            c.click(j);
            assert_eq!(c.stage(), Stage::Focused(j));
            assert_eq!(c.requested_clip(), journey[j].clip);
        }
    }
}

#[test]
fn out_of_range_click_is_ignored() {
    let mut c = overview();
    c.click(2);
    c.click(99);
    assert_eq!(c.stage(), Stage::Focused(2));
    assert_eq!(c.requested_clip(), "akash - idle - vision pro");
}

#[test]
fn walkthrough() {
    let mut c = composer();
    assert_eq!(c.stage(), Stage::Intro);

    c.on_clip_finished(HERO_DROP_CLIP);
    assert_eq!((c.stage(), c.requested_clip()), (Stage::Overview, IDLE_CLIP));

    c.click(0);
    assert_eq!(c.stage(), Stage::Focused(0));
    c.click(0);
    assert_eq!((c.stage(), c.requested_clip()), (Stage::Overview, IDLE_CLIP));

    c.click(2);
    assert_eq!(c.stage(), Stage::Focused(2));
    c.click(3);
    assert_eq!(c.stage(), Stage::Focused(3));
    assert_eq!(c.requested_clip(), "akash-fight-quest");
}

#[test]
fn custom_journey() {
    let waypoints = vec![
        Waypoint::new([1.0, 0.0, 1.0], "One", "first", "wave"),
        Waypoint::new([-1.0, 0.0, 1.0], "Two", "second", "dance"),
    ];
    let mut c = Composer::new(waypoints, "rest", "jump");
    assert_eq!(c.requested_clip(), "jump");

    c.on_clip_finished("jump");
    assert_eq!(c.requested_clip(), "rest");
    c.click(1);
    assert_eq!(c.requested_clip(), "dance");
    assert_eq!(c.waypoints().len(), 2);
}

// ============================================================================
// Clip policy
// ============================================================================

#[test]
fn policy_defaults_to_loop() {
    let policy = ClipPolicy::looping();
    assert_eq!(policy.playback("anything"), Playback::LOOP);
    assert_eq!(policy.playback(HERO_DROP_CLIP), Playback::LOOP);
}

#[test]
fn policy_marks_hero_drop_one_shot() {
    let policy = ClipPolicy::with_one_shot(HERO_DROP_CLIP);
    let hero = policy.playback(HERO_DROP_CLIP);
    assert_eq!(hero.loop_mode, LoopMode::Once);
    assert!(hero.clamp_when_finished);
    assert_eq!(policy.playback(IDLE_CLIP), Playback::LOOP);
}
