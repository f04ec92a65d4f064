use std::path::PathBuf;

/// Errors raised while laying out, rasterizing or writing a card.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The configured font file does not exist.
    #[error("Font not found: {}", .0.display())]
    FontNotFound(PathBuf),

    /// The font file exists but could not be parsed.
    #[error("Invalid font file: {}", .0.display())]
    InvalidFont(PathBuf),

    /// The card configuration is inconsistent (e.g. zero-width column).
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
