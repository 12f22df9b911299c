use std::sync::Arc;

use glam::Vec4;

use crate::resources::image::Image;
use crate::utils::color::hex_to_linear;

/// Lit surface description shared by the forward pass.
#[derive(Debug, Clone)]
pub struct Material {
    /// Linear RGBA base colour, multiplied with `map`.
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub map: Option<Arc<Image>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            metalness: 0.0,
            roughness: 1.0,
            map: None,
        }
    }
}

impl Material {
    /// A material of the given `#rrggbb` colour.
    #[must_use]
    pub fn from_hex(hex: &str) -> Self {
        Self {
            color: hex_to_linear(hex),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: Arc<Image>) -> Self {
        self.map = Some(map);
        self
    }
}
