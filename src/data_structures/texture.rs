//! Decoded textures.
//!
//! A [`Texture`] is an immutable RGBA8 image in CPU memory. It is shared through
//! [`TextureHandle`] between the texture batch, materials and the renderer.

use std::sync::Arc;

use anyhow::Context;

/// Cheap, shared handle to a decoded texture.
pub type TextureHandle = Arc<Texture>;

#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Decodes an encoded image (png, jpeg, ...) and converts it to RGBA8.
    ///
    /// The format is guessed from the bytes, so file extensions don't matter.
    pub fn from_bytes(bytes: &[u8], name: &str) -> anyhow::Result<Self> {
        let img = image::load_from_memory(bytes)
            .with_context(|| format!("could not decode image `{name}`"))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn into_handle(self) -> TextureHandle {
        Arc::new(self)
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
