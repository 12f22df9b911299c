use std::sync::Arc;

use glam::Vec3;

use crate::experience::journey::Waypoint;
use crate::resources::primitives::{SphereOptions, create_sphere};
use crate::resources::{Geometry, Material, Mesh};
use crate::scene::{Node, NodeHandle, Ray, Scene};
use crate::utils::Spring;
use crate::utils::color::hex_to_linear;

pub const MARKER_RADIUS: f32 = 0.3;
/// Height of the overlay panel anchor above the marker centre, at unit scale.
pub const OVERLAY_OFFSET: f32 = 0.7;
pub const ACTIVE_COLOR: &str = "#0056b3";
pub const IDLE_COLOR: &str = "#ffffff";

/// Geometry shared by every marker.
#[must_use]
pub fn marker_geometry() -> Arc<Geometry> {
    Arc::new(create_sphere(SphereOptions {
        radius: MARKER_RADIUS,
        width_segments: 32,
        height_segments: 32,
    }))
}

/// Clickable sphere for one waypoint.
///
/// Grows toward `hover_scale` on a spring while the pointer is over it and
/// turns blue while its waypoint is focused.
pub struct StationMarker {
    pub index: usize,
    pub waypoint: Waypoint,
    node: NodeHandle,
    hover_scale: f32,
    hovered: bool,
    scale: Spring,
}

impl StationMarker {
    pub fn spawn(
        scene: &mut Scene,
        index: usize,
        waypoint: Waypoint,
        geometry: Arc<Geometry>,
        hover_scale: f32,
    ) -> Self {
        let material = Material::from_hex(IDLE_COLOR)
            .with_metalness(0.2)
            .with_roughness(0.1);
        let mesh = Mesh::new(format!("station_{index}"), geometry, material).with_shadows(true, false);

        let mut node = Node::new(format!("station_{index}"));
        node.transform.position = waypoint.position();
        let handle = scene.add_node(node);
        scene.set_mesh(handle, mesh);

        Self {
            index,
            waypoint,
            node: handle,
            hover_scale,
            hovered: false,
            scale: Spring::new(1.0),
        }
    }

    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Current (spring-driven) scale factor.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        self.scale.set_target(if hovered { self.hover_scale } else { 1.0 });
    }

    /// Distance along `ray` to the marker at its current scale.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_sphere(self.waypoint.position(), MARKER_RADIUS * self.scale.value())
    }

    /// World-space point the overlay panel hangs from.
    #[must_use]
    pub fn overlay_anchor(&self) -> Vec3 {
        self.waypoint.position() + Vec3::Y * OVERLAY_OFFSET * self.scale.value()
    }

    /// Advances the hover spring and writes scale and colour to the scene.
    pub fn update(&mut self, dt: f32, active: bool, scene: &mut Scene) {
        let scale = self.scale.update(dt);
        if let Some(node) = scene.get_node_mut(self.node) {
            node.transform.scale = Vec3::splat(scale);
        }
        if let Some(mesh) = scene.meshes.get_mut(self.node) {
            mesh.material.color = hex_to_linear(if active { ACTIVE_COLOR } else { IDLE_COLOR });
        }
    }
}

/// Index of the nearest marker hit by `ray`.
#[must_use]
pub fn pick_nearest(markers: &[StationMarker], ray: &Ray) -> Option<usize> {
    markers
        .iter()
        .filter_map(|m| m.pick(ray).map(|t| (m.index, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
