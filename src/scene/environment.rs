//! Scene-wide lighting and atmosphere: background, linear fog, one ambient
//! light and one shadow-casting directional light.

use glam::{Vec3, Vec4};

use crate::settings::RenderSettings;
use crate::utils::color::hex_to_linear;

/// Linear distance fog, blended toward `color` between `near` and `far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    /// Linear RGB.
    pub color: Vec3,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog factor in `[0, 1]` at view distance `distance`.
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        ((distance - self.near) / (self.far - self.near).max(1e-4)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub cast_shadow: bool,
    /// Half extent of the orthographic shadow frustum.
    pub shadow_extent: f32,
}

impl DirectionalLight {
    /// Unit vector pointing from the light toward its target.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Linear RGBA clear colour.
    pub background: Vec4,
    pub fog: Option<Fog>,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
}

impl Environment {
    #[must_use]
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            background: hex_to_linear(&settings.background),
            fog: Some(Fog {
                color: hex_to_linear(&settings.fog.color).truncate(),
                near: settings.fog.near,
                far: settings.fog.far,
            }),
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: settings.ambient_intensity,
            },
            sun: DirectionalLight {
                position: settings.sun_position(),
                target: Vec3::ZERO,
                color: Vec3::ONE,
                intensity: settings.sun_intensity,
                cast_shadow: true,
                shadow_extent: settings.shadow_extent,
            },
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}
