//! Station Marker Tests
//!
//! Tests for:
//! - Marker spawning (node, mesh, material)
//! - Hover scale spring (continuous, settles on 1.2x and back)
//! - Ray picking and nearest-marker selection
//! - Active colour and overlay anchor

use glam::Vec3;

use journey::experience::station::{
    ACTIVE_COLOR, IDLE_COLOR, MARKER_RADIUS, OVERLAY_OFFSET, marker_geometry, pick_nearest,
};
use journey::experience::{StationMarker, Waypoint};
use journey::scene::{Ray, Scene};
use journey::utils::Spring;
use journey::utils::color::hex_to_linear;

const DT: f32 = 1.0 / 60.0;
const HOVER_SCALE: f32 = 1.2;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn waypoint(position: [f32; 3]) -> Waypoint {
    Waypoint::new(position, "Title", "Body", "idle")
}

fn spawn(scene: &mut Scene, index: usize, position: [f32; 3]) -> StationMarker {
    StationMarker::spawn(scene, index, waypoint(position), marker_geometry(), HOVER_SCALE)
}

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn spawn_creates_shadow_casting_sphere() {
    let mut scene = Scene::new();
    let marker = spawn(&mut scene, 0, [-5.0, 0.1, -2.0]);

    let node = scene.get_node(marker.node()).unwrap();
    assert_eq!(node.transform.position, Vec3::new(-5.0, 0.1, -2.0));

    let mesh = &scene.meshes[marker.node()];
    assert!(mesh.cast_shadow);
    assert_eq!(mesh.material.color, hex_to_linear(IDLE_COLOR));
    assert!((mesh.material.metalness - 0.2).abs() < 1e-6);
    assert!((mesh.material.roughness - 0.1).abs() < 1e-6);

    let bounds = mesh.geometry.bounding_box().unwrap();
    assert!(approx(bounds.size().x, MARKER_RADIUS * 2.0));
}

// ============================================================================
// Hover spring
// ============================================================================

#[test]
fn hover_grows_smoothly_to_target() {
    let mut scene = Scene::new();
    let mut marker = spawn(&mut scene, 0, [0.0, 0.1, 0.0]);
    assert!(approx(marker.scale(), 1.0));

    marker.set_hovered(true);
    assert!(marker.is_hovered());
    marker.update(DT, false, &mut scene);
    let first = marker.scale();
    assert!(first > 1.0 && first < HOVER_SCALE, "snapped to {first}");

    for _ in 0..90 {
        marker.update(DT, false, &mut scene);
    }
    assert!(approx(marker.scale(), HOVER_SCALE));
    let node_scale = scene.get_node(marker.node()).unwrap().transform.scale;
    assert!(approx(node_scale.x, HOVER_SCALE));

    marker.set_hovered(false);
    for _ in 0..90 {
        marker.update(DT, false, &mut scene);
    }
    assert!(approx(marker.scale(), 1.0));
}

#[test]
fn spring_retarget_keeps_velocity() {
    let mut spring = Spring::new(1.0);
    spring.set_target(1.2);
    spring.update(0.05);
    let mid = spring.value();

    // Reversing mid-flight does not jump back.
    spring.set_target(1.0);
    let next = spring.update(DT);
    assert!((next - mid).abs() < 0.05);
}

#[test]
fn spring_settles_at_any_frame_rate() {
    for (dt, frames) in [(0.05, 40), (1.0 / 144.0, 288), (0.2, 10)] {
        let mut spring = Spring::new(0.0);
        spring.set_target(1.0);
        for _ in 0..frames {
            spring.update(dt);
        }
        assert!(spring.is_settled(), "dt {dt} left the spring at {}", spring.value());
        assert!((spring.value() - 1.0).abs() < f32::EPSILON);
    }
}

// ============================================================================
// Picking
// ============================================================================

#[test]
fn pick_hits_marker_along_ray() {
    let mut scene = Scene::new();
    let marker = spawn(&mut scene, 0, [0.0, 0.1, 0.0]);

    let eye = Vec3::new(0.0, 5.0, 12.0);
    let hit = Ray::new(eye, Vec3::new(0.0, 0.1, 0.0) - eye);
    let t = marker.pick(&hit).unwrap();
    let expected = eye.distance(Vec3::new(0.0, 0.1, 0.0)) - MARKER_RADIUS;
    assert!(approx(t, expected));

    let miss = Ray::new(eye, Vec3::new(3.0, 0.1, 0.0) - eye);
    assert!(marker.pick(&miss).is_none());
}

#[test]
fn hovered_marker_is_easier_to_hit() {
    let mut scene = Scene::new();
    let mut marker = spawn(&mut scene, 0, [0.0, 0.0, 0.0]);
    // Grazes the sphere at 1.1x the resting radius.
    let ray = Ray::new(Vec3::new(MARKER_RADIUS * 1.1, 0.0, 5.0), Vec3::NEG_Z);
    assert!(marker.pick(&ray).is_none());

    marker.set_hovered(true);
    for _ in 0..90 {
        marker.update(DT, false, &mut scene);
    }
    assert!(marker.pick(&ray).is_some());
}

#[test]
fn pick_nearest_prefers_closest_hit() {
    let mut scene = Scene::new();
    let markers = vec![
        spawn(&mut scene, 0, [0.0, 0.0, -10.0]),
        spawn(&mut scene, 1, [0.0, 0.0, -4.0]),
        spawn(&mut scene, 2, [5.0, 0.0, -4.0]),
    ];

    let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
    assert_eq!(pick_nearest(&markers, &ray), Some(1));

    let away = Ray::new(Vec3::ZERO, Vec3::Z);
    assert_eq!(pick_nearest(&markers, &away), None);
}

// ============================================================================
// Active state and overlay
// ============================================================================

#[test]
fn active_marker_turns_blue() {
    let mut scene = Scene::new();
    let mut marker = spawn(&mut scene, 3, [-2.0, 0.1, -10.0]);

    marker.update(DT, true, &mut scene);
    assert_eq!(scene.meshes[marker.node()].material.color, hex_to_linear(ACTIVE_COLOR));

    marker.update(DT, false, &mut scene);
    assert_eq!(scene.meshes[marker.node()].material.color, hex_to_linear(IDLE_COLOR));
}

#[test]
fn overlay_anchor_scales_with_marker() {
    let mut scene = Scene::new();
    let mut marker = spawn(&mut scene, 0, [2.0, 0.1, -6.0]);
    let base = Vec3::new(2.0, 0.1, -6.0);
    assert!((marker.overlay_anchor() - (base + Vec3::Y * OVERLAY_OFFSET)).length() < 1e-5);

    marker.set_hovered(true);
    for _ in 0..90 {
        marker.update(DT, false, &mut scene);
    }
    let anchor = marker.overlay_anchor();
    assert!(approx(anchor.y, base.y + OVERLAY_OFFSET * HOVER_SCALE));
}
