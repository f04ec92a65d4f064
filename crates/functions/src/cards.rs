//! Card renderers used by the handlers.
//!
//! Handlers only see the traits; the font-backed implementations are built
//! once per invocation from the configured font paths.

use std::path::{Path, PathBuf};

use pressline_core::TableData;
use pressline_render::title_card::TitleCardFonts;
use pressline_render::{
    compute_layout, render_table_card, render_title_card, save_jpeg, save_png, FontResource, RenderError,
    TableCardConfig, TitleCardConfig, JPEG_QUALITY,
};

/// Renders an article's summary table to `{stem}.jpg`.
pub trait TableCardRenderer: Send + Sync {
    fn render_table(&self, table: &TableData, stem: &str) -> Result<PathBuf, RenderError>;
}

/// Renders a blog title card to `{stem}.png`.
pub trait TitleCardRenderer: Send + Sync {
    fn render_title(&self, title: &str, tags: &[String], stem: &str) -> Result<PathBuf, RenderError>;
}

pub struct FontTableCardRenderer {
    font: FontResource,
    config: TableCardConfig,
    out_dir: PathBuf,
}

impl FontTableCardRenderer {
    pub fn new(font: FontResource, config: TableCardConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            font,
            config,
            out_dir: out_dir.into(),
        }
    }

    /// Load the font at `font_path` and use the social-card preset.
    pub fn load(font_path: &Path, out_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        Ok(Self::new(
            FontResource::load(font_path)?,
            TableCardConfig::social_card(),
            out_dir,
        ))
    }
}

impl TableCardRenderer for FontTableCardRenderer {
    fn render_table(&self, table: &TableData, stem: &str) -> Result<PathBuf, RenderError> {
        let layout = compute_layout(table, &self.config)?;
        let image = render_table_card(&layout, &self.font, &self.config);
        save_jpeg(&image, &self.out_dir, stem, JPEG_QUALITY)
    }
}

pub struct FontTitleCardRenderer {
    serif: FontResource,
    sans: FontResource,
    config: TitleCardConfig,
    out_dir: PathBuf,
}

impl FontTitleCardRenderer {
    pub fn load(serif_path: &Path, sans_path: &Path, out_dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        Ok(Self {
            serif: FontResource::load(serif_path)?,
            sans: FontResource::load(sans_path)?,
            config: TitleCardConfig::default(),
            out_dir: out_dir.into(),
        })
    }
}

impl TitleCardRenderer for FontTitleCardRenderer {
    fn render_title(&self, title: &str, tags: &[String], stem: &str) -> Result<PathBuf, RenderError> {
        let fonts = TitleCardFonts {
            serif: &self.serif,
            sans: &self.sans,
        };
        let image = render_title_card(title, tags, &fonts, &self.config);
        save_png(&image, &self.out_dir, stem)
    }
}
