//! Painting a [`TableLayout`] onto an RGB canvas.

use ab_glyph::PxScale;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::font::FontResource;
use crate::layout::{Segment, TableCardConfig, TableLayout, TextBlock};

/// Rasterize a table card.
///
/// The canvas is `layout.width × layout.height`, filled with the configured
/// background. Separators and text use the foreground colour.
pub fn render_table_card(layout: &TableLayout, font: &FontResource, config: &TableCardConfig) -> RgbImage {
    let mut canvas = render_frame(layout, config);
    let ink = Rgb(config.foreground);
    let scale = PxScale::from(config.font_size);

    for row in &layout.rows {
        for block in [&row.label, &row.content] {
            draw_block(&mut canvas, block, layout.line_height, font, scale, ink);
        }
    }

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        rows = layout.rows.len(),
        "Rendered table card"
    );
    canvas
}

/// Background plus separator lines, without any text.
pub fn render_frame(layout: &TableLayout, config: &TableCardConfig) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, Rgb(config.background));
    let ink = Rgb(config.foreground);

    draw_segment(&mut canvas, layout.vertical_separator, ink);
    for segment in &layout.horizontal_separators {
        draw_segment(&mut canvas, *segment, ink);
    }
    canvas
}

fn draw_segment(canvas: &mut RgbImage, segment: Segment, ink: Rgb<u8>) {
    draw_line_segment_mut(
        canvas,
        (segment.from.0 as f32, segment.from.1 as f32),
        (segment.to.0 as f32, segment.to.1 as f32),
        ink,
    );
}

fn draw_block(
    canvas: &mut RgbImage,
    block: &TextBlock,
    line_height: u32,
    font: &FontResource,
    scale: PxScale,
    ink: Rgb<u8>,
) {
    for (i, line) in block.lines.iter().enumerate() {
        let y = block.y + i as u32 * line_height;
        draw_text_mut(canvas, ink, block.x as i32, y as i32, scale, font.font(), line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use pressline_core::TableData;

    fn sample(n: usize) -> TableData {
        (0..n).map(|i| (format!("label{i}"), format!("content {i}"))).collect()
    }

    fn inked_rows(image: &RgbImage, ink: Rgb<u8>) -> Vec<u32> {
        (0..image.height())
            .filter(|&y| (0..image.width()).all(|x| *image.get_pixel(x, y) == ink))
            .collect()
    }

    fn inked_columns(image: &RgbImage, ink: Rgb<u8>) -> Vec<u32> {
        (0..image.width())
            .filter(|&x| (0..image.height()).all(|y| *image.get_pixel(x, y) == ink))
            .collect()
    }

    #[test]
    fn frame_has_n_minus_one_rules_and_one_column_rule() {
        let config = TableCardConfig::social_card();
        for n in [1, 3, 5] {
            let layout = compute_layout(&sample(n), &config).unwrap();
            let frame = render_frame(&layout, &config);
            let ink = Rgb(config.foreground);

            assert_eq!((frame.width(), frame.height()), (1200, 630));
            assert_eq!(inked_rows(&frame, ink).len(), n - 1, "{n} entries");
            assert_eq!(inked_columns(&frame, ink), [400]);
        }
    }

    #[test]
    fn empty_table_frame_is_background_with_column_rule() {
        let config = TableCardConfig::fixed_label_column();
        let layout = compute_layout(&TableData::new(), &config).unwrap();
        let frame = render_frame(&layout, &config);
        let ink = Rgb(config.foreground);

        assert!(inked_rows(&frame, ink).is_empty());
        assert_eq!(inked_columns(&frame, ink), [220]);
        assert_eq!(*frame.get_pixel(0, 0), Rgb(config.background));
    }

    #[test]
    fn renders_text_when_a_system_font_is_available() {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
        ];
        let Some(font) = candidates.iter().find_map(|p| FontResource::load(p).ok()) else {
            return;
        };

        let config = TableCardConfig::social_card();
        let table: TableData = [("Who", "someone"), ("Why", "because")].into_iter().collect();
        let layout = compute_layout(&table, &config).unwrap();
        let card = render_table_card(&layout, &font, &config);
        let frame = render_frame(&layout, &config);

        assert_ne!(card, frame);
    }
}
