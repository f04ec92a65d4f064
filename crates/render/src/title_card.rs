//! Blog OG card: accent bar, tag pills, wrapped title and author credit.

use ab_glyph::PxScale;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::font::FontResource;
use crate::layout::{OG_HEIGHT, OG_WIDTH};
use crate::wrap::wrap;

/// Geometry, colours and text of a blog card.
#[derive(Debug, Clone)]
pub struct TitleCardConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    /// Width of the accent bar on the left edge.
    pub bar_width: u32,
    pub title_size: f32,
    pub tag_size: f32,
    pub author_size: f32,
    /// Title wrap width in characters.
    pub title_wrap: usize,
    pub title_line_step: u32,
    pub tag_step: u32,
    pub tag_pill_height: u32,
    pub author: String,
    pub primary: [u8; 3],
    pub secondary: [u8; 3],
    pub accent: [u8; 3],
    /// Alpha of the black overlay composited over the finished card.
    pub overlay_alpha: u8,
}

impl Default for TitleCardConfig {
    fn default() -> Self {
        Self {
            width: OG_WIDTH,
            height: OG_HEIGHT,
            margin: 60,
            bar_width: 20,
            title_size: 64.0,
            tag_size: 32.0,
            author_size: 40.0,
            title_wrap: 25,
            title_line_step: 80,
            tag_step: 50,
            tag_pill_height: 45,
            author: "contradiction29".to_string(),
            primary: [220, 91, 102],
            secondary: [0, 0, 0],
            accent: [255, 255, 255],
            overlay_alpha: 32,
        }
    }
}

/// Serif face for title and author, sans face for tags.
pub struct TitleCardFonts<'a> {
    pub serif: &'a FontResource,
    pub sans: &'a FontResource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagPill {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub text_x: i32,
    pub text_y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleCardLayout {
    pub tags: Vec<TagPill>,
    pub title: Vec<PlacedLine>,
    pub author: PlacedLine,
}

/// Place tags, title lines and the author credit.
///
/// `tag_width` and `author_width` measure rendered text in px.
pub fn layout_title_card(
    title: &str,
    tags: &[String],
    config: &TitleCardConfig,
    tag_width: impl Fn(&str) -> u32,
    author_width: u32,
) -> TitleCardLayout {
    let left = (config.bar_width + 40) as i32;
    let mut tag_y = config.margin as i32;

    let mut pills = Vec::with_capacity(tags.len());
    for tag in tags {
        let text = format!("#{tag}");
        let width = tag_width(&text) + 20;
        pills.push(TagPill {
            x: left,
            y: tag_y - 5,
            width,
            height: config.tag_pill_height,
            text_x: left + 10,
            text_y: tag_y,
            text,
        });
        tag_y += config.tag_step as i32;
    }

    let mut title_y = (tag_y + 40).max((config.height / 3) as i32);
    let mut lines = Vec::new();
    for line in wrap(title, config.title_wrap) {
        lines.push(PlacedLine {
            text: line,
            x: left,
            y: title_y,
        });
        title_y += config.title_line_step as i32;
    }

    let author = PlacedLine {
        text: config.author.clone(),
        x: config.width as i32 - config.margin as i32 - author_width as i32,
        y: config.height as i32 - config.margin as i32 - 48,
    };

    TitleCardLayout {
        tags: pills,
        title: lines,
        author,
    }
}

/// Render the blog card for `title` and `tags`.
pub fn render_title_card(
    title: &str,
    tags: &[String],
    fonts: &TitleCardFonts<'_>,
    config: &TitleCardConfig,
) -> RgbImage {
    let tag_scale = PxScale::from(config.tag_size);
    let title_scale = PxScale::from(config.title_size);
    let author_scale = PxScale::from(config.author_size);

    let layout = layout_title_card(
        title,
        tags,
        config,
        |text| fonts.sans.text_width(config.tag_size, text),
        fonts.serif.text_width(config.author_size, &config.author),
    );

    let mut canvas = RgbImage::from_pixel(config.width, config.height, Rgb(config.secondary));
    let primary = Rgb(config.primary);
    let secondary = Rgb(config.secondary);
    let accent = Rgb(config.accent);

    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(0, 0).of_size(config.bar_width + 1, config.height),
        primary,
    );

    for pill in &layout.tags {
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(pill.x, pill.y).of_size(pill.width.max(1), pill.height.max(1)),
            primary,
        );
        draw_text_mut(&mut canvas, secondary, pill.text_x, pill.text_y, tag_scale, fonts.sans.font(), &pill.text);
    }

    for line in &layout.title {
        draw_text_mut(&mut canvas, accent, line.x, line.y, title_scale, fonts.serif.font(), &line.text);
    }

    let author = &layout.author;
    draw_text_mut(&mut canvas, accent, author.x, author.y, author_scale, fonts.serif.font(), &author.text);

    darken(&mut canvas, config.overlay_alpha);
    canvas
}

/// Composite a black layer of opacity `alpha` over the whole canvas.
fn darken(canvas: &mut RgbImage, alpha: u8) {
    let keep = 255 - alpha as u32;
    for pixel in canvas.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = ((*channel as u32 * keep + 127) / 255) as u8;
        }
    }
}
