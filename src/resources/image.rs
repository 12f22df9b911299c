use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded 8-bit RGBA pixels in sRGB.
#[derive(Debug, Clone)]
pub struct Image {
    id: u64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    /// `None` if `data` is not `width * height * 4` bytes.
    #[must_use]
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return None;
        }
        Some(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            data,
        })
    }

    /// A 1x1 image of one colour.
    #[must_use]
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width: 1,
            height: 1,
            data: rgba.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Decodes PNG, JPEG or WebP bytes.
    pub fn decode(bytes: &[u8]) -> crate::errors::Result<Self> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::new_rgba8(width, height, img.into_raw()).ok_or_else(|| {
            crate::errors::JourneyError::ImageDecodeError("decoded image is empty".into())
        })
    }
}
