use glam::{Affine3A, Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::scene::ray::Ray;

/// Perspective camera component.
///
/// The camera's pose comes from its node's world matrix; call
/// [`update_view_projection`](Self::update_view_projection) after the scene
/// matrices are refreshed.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov_degrees` is the vertical field of view.
    #[must_use]
    pub fn new_perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    pub fn update_projection_matrix(&mut self) {
        // perspective_rh maps depth to [0, 1], matching wgpu.
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    /// Ray from the eye through a pixel, `screen_pos` measured from the
    /// top-left corner in the same units as `screen_size`.
    #[must_use]
    pub fn screen_ray(&self, screen_pos: Vec2, screen_size: Vec2) -> Ray {
        let size = screen_size.max(Vec2::ONE);
        let ndc = Vec2::new(
            screen_pos.x / size.x * 2.0 - 1.0,
            1.0 - screen_pos.y / size.y * 2.0,
        );

        let inv = self.view_projection_matrix.inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));

        Ray::new(near, far - near)
    }

    /// Projects a world point to screen coordinates (top-left origin).
    ///
    /// `None` when the point is behind the camera.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec3, screen_size: Vec2) -> Option<Vec2> {
        let clip = self.view_projection_matrix * point.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * screen_size.x,
            (1.0 - ndc.y) * 0.5 * screen_size.y,
        ))
    }
}
