//! Font loading.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};

use crate::error::RenderError;

/// A parsed font face ready for rasterization.
pub struct FontResource {
    font: FontVec,
    path: PathBuf,
}

impl FontResource {
    /// Load the first face of a `.ttf`, `.otf` or `.ttc` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        Self::load_indexed(path, 0)
    }

    /// Load face `index` of a font collection.
    ///
    /// # Errors
    ///
    /// - [`RenderError::FontNotFound`] if the file does not exist.
    /// - [`RenderError::InvalidFont`] if the bytes are not a usable face.
    pub fn load_indexed(path: impl AsRef<Path>, index: u32) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::FontNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|_| RenderError::InvalidFont(path.to_path_buf()))?;

        tracing::debug!(path = %path.display(), index, "Loaded font");
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Advance width of `text` in px at `size`.
    pub fn text_width(&self, size: f32, text: &str) -> u32 {
        imageproc::drawing::text_size(PxScale::from(size), &self.font, text).0
    }
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource").field("path", &self.path).finish()
    }
}
