//! CPU mirrors of the WGSL uniform blocks. Layouts are std140-compatible:
//! every member is a `vec4` or `mat4x4`.

use glam::{Mat3, Mat4, Vec4};

use crate::resources::Material;
use crate::scene::{Camera, Environment};

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub light_view_projection: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// xyz: direction the light travels, w: intensity.
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    /// rgb: colour premultiplied by intensity.
    pub ambient: [f32; 4],
    /// rgb: linear colour, w: 1 when fog is on.
    pub fog_color: [f32; 4],
    /// x: near, y: far, z: shadow texel size, w: 1 when shadows are on.
    pub fog_params: [f32; 4],
}

impl FrameUniforms {
    #[must_use]
    pub fn new(camera: &Camera, environment: &Environment, light_view_projection: Mat4, shadow_map_size: u32) -> Self {
        let sun = &environment.sun;
        let ambient = environment.ambient.color * environment.ambient.intensity;
        let (fog_color, near, far, fog_on) = match environment.fog {
            Some(fog) => (fog.color, fog.near, fog.far, 1.0),
            None => (glam::Vec3::ZERO, 0.0, 1.0, 0.0),
        };

        Self {
            view_projection: camera.view_projection_matrix().to_cols_array_2d(),
            light_view_projection: light_view_projection.to_cols_array_2d(),
            camera_position: camera.position().extend(1.0).to_array(),
            sun_direction: sun.direction().extend(sun.intensity).to_array(),
            sun_color: sun.color.extend(1.0).to_array(),
            ambient: ambient.extend(1.0).to_array(),
            fog_color: fog_color.extend(fog_on).to_array(),
            fog_params: [
                near,
                far,
                1.0 / shadow_map_size.max(1) as f32,
                if sun.cast_shadow { 1.0 } else { 0.0 },
            ],
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: metalness, y: roughness, z: 1 when receiving shadows.
    pub params: [f32; 4],
}

impl ObjectUniforms {
    #[must_use]
    pub fn new(model: Mat4, material: &Material, receive_shadow: bool) -> Self {
        let normal_matrix = Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose());
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: material.color.to_array(),
            params: Vec4::new(
                material.metalness,
                material.roughness,
                if receive_shadow { 1.0 } else { 0.0 },
                0.0,
            )
            .to_array(),
        }
    }
}
