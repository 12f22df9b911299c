//! Asset loading: glTF models and image files.

pub mod gltf;

use std::path::Path;

pub use self::gltf::{GltfLoader, LoadedModel};

use crate::errors::{JourneyError, Result};
use crate::resources::Image;

/// Reads and decodes an image file into RGBA8.
pub fn load_image_from_file(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(JourneyError::AssetNotFound(path.display().to_string()));
    }
    Image::decode(&std::fs::read(path)?)
}
