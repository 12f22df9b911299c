use std::sync::Arc;

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;

/// Drawable component: shared geometry plus a per-instance material.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Arc<Geometry>, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[must_use]
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }
}
