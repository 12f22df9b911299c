use glam::{Vec2, Vec3};

use crate::app::input::{Input, MouseButton};
use crate::scene::transform::Transform;

/// Orbit camera controls around a focus point.
///
/// The spherical state is re-derived from the camera position every update,
/// so anything else that moves the camera or the focus (the camera rig) is
/// picked up before user input is applied.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Focus point the camera orbits and looks at.
    pub center: Vec3,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            enabled: true,
            min_distance: 1.0,
            max_distance: 100.0,

            center,

            rotate_delta: Vec2::ZERO,
        }
    }

    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let offset = transform.position - self.center;
        let mut radius = offset.length().max(1e-4);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let screen_height = input.screen_size().y.max(1.0);

        if self.enabled && input.get_mouse_button(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta -= input.mouse_delta() * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let delta_apply = self.rotate_delta * (1.0 - retention);

            theta += delta_apply.x;
            phi += delta_apply.y;

            self.rotate_delta *= retention;
        } else {
            theta += self.rotate_delta.x;
            phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        const EPS: f32 = 0.0001;
        phi = phi.clamp(EPS, std::f32::consts::PI - EPS);

        let scroll = input.scroll_delta().y;
        if self.enabled && scroll != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(scroll.abs());
            if scroll > 0.0 {
                radius *= scale;
            } else {
                radius /= scale;
            }
        }
        radius = radius.clamp(self.min_distance, self.max_distance);

        if self.enabled && input.get_mouse_button(MouseButton::Right) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * radius * half_fov.tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let forward = -spherical_direction(theta, phi);
            let right = forward.cross(Vec3::Y).normalize();
            let up = right.cross(forward).normalize();

            let delta = input.mouse_delta();
            self.center += (right * -delta.x + up * delta.y) * pixels_to_world_ratio * self.pan_speed;
        }

        transform.position = self.center + spherical_direction(theta, phi) * radius;
        transform.look_at(self.center, Vec3::Y);
    }
}

fn spherical_direction(theta: f32, phi: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
}
