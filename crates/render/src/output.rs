//! Writing rendered cards to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::error::RenderError;

/// JPEG quality used for table cards.
pub const JPEG_QUALITY: u8 = 95;

/// Write `image` as `{dir}/{stem}.jpg` and return the path.
pub fn save_jpeg(image: &RgbImage, dir: &Path, stem: &str, quality: u8) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.jpg"));

    let mut writer = BufWriter::new(File::create(&path)?);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(image)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), "Wrote JPEG card");
    Ok(path)
}

/// Write `image` as `{dir}/{stem}.png` and return the path.
pub fn save_png(image: &RgbImage, dir: &Path, stem: &str) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.png"));
    image.save_with_format(&path, ImageFormat::Png)?;

    tracing::debug!(path = %path.display(), "Wrote PNG card");
    Ok(path)
}
