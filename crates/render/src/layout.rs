//! Geometry of the article table card.
//!
//! [`compute_layout`] turns a [`TableData`] and a [`TableCardConfig`] into a
//! [`TableLayout`]: canvas size, separator segments and the wrapped,
//! truncated text of every row with its pixel position. No font is needed;
//! the rasterizer only paints what the layout describes.

use pressline_core::TableData;
use serde::Serialize;

use crate::error::RenderError;
use crate::wrap::{truncate_lines, wrap, DEFAULT_ELLIPSIS};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Standard Open Graph canvas width.
pub const OG_WIDTH: u32 = 1200;
/// Standard Open Graph canvas height.
pub const OG_HEIGHT: u32 = 630;

/// Label present in the standard article template.
pub const STANDARD_TEMPLATE_LABEL: &str = "Who(誰が)";

/// How the canvas height is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasHeight {
    /// Fixed height; rows share it and overflowing text is truncated.
    Fixed(u32),
    /// Height grows to fit every wrapped line; nothing is truncated.
    FitContent,
}

/// Relative widths of the label and content columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub label: u32,
    pub content: u32,
}

impl Ratio {
    pub const fn new(label: u32, content: u32) -> Self {
        Self { label, content }
    }
}

/// Where the vertical separator between the two columns sits.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSplit {
    /// Split the canvas width by a fixed ratio.
    Ratio(Ratio),
    /// Label column has a fixed pixel width.
    FixedLabelWidth(u32),
    /// Use `present` when the table contains `label`, otherwise `absent`.
    WhenLabelPresent {
        label: String,
        present: Ratio,
        absent: Ratio,
    },
}

/// How a fixed canvas height is shared between rows.
#[derive(Debug, Clone, PartialEq)]
pub enum RowWeighting {
    /// Every row gets the same share.
    Even,
    /// Rows whose label matches get the listed weight, all others `default`.
    Weighted {
        default: u32,
        weights: Vec<(String, u32)>,
    },
}

impl RowWeighting {
    fn weight_of(&self, label: &str) -> u32 {
        match self {
            Self::Even => 1,
            Self::Weighted { default, weights } => weights
                .iter()
                .find(|(l, _)| l == label)
                .map_or(*default, |(_, w)| *w),
        }
    }
}

/// Options for the table card.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCardConfig {
    pub width: u32,
    pub height: CanvasHeight,
    pub split: ColumnSplit,
    pub rows: RowWeighting,
    /// Font size in px.
    pub font_size: f32,
    /// Vertical distance between consecutive text lines, in px.
    pub line_height: u32,
    /// Space above the first row and below the last row (fixed height only).
    pub margin: u32,
    /// Inner padding of every cell.
    pub padding: u32,
    /// Approximate glyph width used to turn pixel widths into characters.
    pub char_width: u32,
    pub ellipsis: String,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
}

impl TableCardConfig {
    /// 1200×630 card for social posts. Label and content split 1:2, and
    /// the narrative rows ("Then", "Why") get twice the height.
    pub fn social_card() -> Self {
        Self {
            width: OG_WIDTH,
            height: CanvasHeight::Fixed(OG_HEIGHT),
            split: ColumnSplit::Ratio(Ratio::new(1, 2)),
            rows: RowWeighting::Weighted {
                default: 1,
                weights: vec![
                    ("Then".to_string(), 2),
                    ("Then(どうした)".to_string(), 2),
                    ("Why".to_string(), 2),
                    ("Why(なぜ)".to_string(), 2),
                ],
            },
            font_size: 20.0,
            line_height: 30,
            margin: 20,
            padding: 10,
            char_width: 20,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            background: [255, 255, 255],
            foreground: [0, 0, 0],
        }
    }

    /// 1200×630 card with a 220 px label column and evenly shared rows.
    pub fn fixed_label_column() -> Self {
        Self {
            split: ColumnSplit::FixedLabelWidth(220),
            rows: RowWeighting::Even,
            ..Self::social_card()
        }
    }

    /// 620 px wide card whose height follows the content. Standard
    /// template tables split 1:2, anything else 1:1.
    pub fn fit_content() -> Self {
        Self {
            width: 620,
            height: CanvasHeight::FitContent,
            split: ColumnSplit::WhenLabelPresent {
                label: STANDARD_TEMPLATE_LABEL.to_string(),
                present: Ratio::new(1, 2),
                absent: Ratio::new(1, 1),
            },
            rows: RowWeighting::Even,
            line_height: 20,
            margin: 0,
            padding: 5,
            ..Self::social_card()
        }
    }
}

// ---------------------------------------------------------------------------
// Layout output
// ---------------------------------------------------------------------------

/// A 1 px line between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub from: (u32, u32),
    pub to: (u32, u32),
}

/// Wrapped text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub x: u32,
    pub y: u32,
    pub lines: Vec<String>,
    /// Character budget per line.
    pub wrap_width: usize,
    /// Pixel budget per line.
    pub column_px: u32,
    pub truncated: bool,
}

/// One label/content row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLayout {
    pub top: u32,
    pub height: u32,
    pub line_budget: Option<usize>,
    pub label: TextBlock,
    pub content: TextBlock,
}

/// Everything the rasterizer needs to paint a table card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub width: u32,
    pub height: u32,
    pub line_height: u32,
    pub vertical_separator: Segment,
    pub horizontal_separators: Vec<Segment>,
    pub rows: Vec<RowLayout>,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Lay out `table` on a canvas described by `config`.
///
/// A table with no entries yields no rows and only the vertical separator.
///
/// # Errors
///
/// [`RenderError::InvalidConfig`] when the configuration cannot produce a
/// card: zero sizes, zero ratio parts, a label column outside the canvas, or
/// a fixed height smaller than its margins.
pub fn compute_layout(table: &TableData, config: &TableCardConfig) -> Result<TableLayout, RenderError> {
    validate(config)?;

    let label_px = label_column_px(table, config)?;
    let content_px = config.width - label_px;
    let label_wrap = chars_for(label_px, config);
    let content_wrap = chars_for(content_px, config);

    let blocks: Vec<(Vec<String>, Vec<String>)> = table
        .iter()
        .map(|(label, content)| (wrap(label, label_wrap), wrap(content, content_wrap)))
        .collect();

    let (height, row_spans) = match config.height {
        CanvasHeight::Fixed(height) => (height, fixed_row_spans(table, config, height)),
        CanvasHeight::FitContent => fitted_row_spans(&blocks, config),
    };

    let mut rows = Vec::with_capacity(blocks.len());
    let mut horizontal_separators = Vec::new();
    let count = blocks.len();

    for (index, ((label_lines, content_lines), (top, row_height))) in
        blocks.into_iter().zip(row_spans).enumerate()
    {
        let line_budget = match config.height {
            CanvasHeight::Fixed(_) => {
                let inner = row_height.saturating_sub(2 * config.padding);
                Some(((inner / config.line_height) as usize).max(1))
            }
            CanvasHeight::FitContent => None,
        };

        let text_top = top + config.padding;
        let label = text_block(label_lines, config.padding, text_top, label_wrap, label_px, line_budget, config);
        let content = text_block(
            content_lines,
            label_px + config.padding,
            text_top,
            content_wrap,
            content_px,
            line_budget,
            config,
        );

        if index + 1 < count {
            let y = top + row_height;
            horizontal_separators.push(Segment {
                from: (0, y),
                to: (config.width, y),
            });
        }

        rows.push(RowLayout {
            top,
            height: row_height,
            line_budget,
            label,
            content,
        });
    }

    Ok(TableLayout {
        width: config.width,
        height,
        line_height: config.line_height,
        vertical_separator: Segment {
            from: (label_px, 0),
            to: (label_px, height),
        },
        horizontal_separators,
        rows,
    })
}

fn validate(config: &TableCardConfig) -> Result<(), RenderError> {
    let invalid = |msg: &str| Err(RenderError::InvalidConfig(msg.to_string()));

    if config.width == 0 {
        return invalid("width must be positive");
    }
    if config.line_height == 0 || config.char_width == 0 {
        return invalid("line_height and char_width must be positive");
    }
    if config.font_size.is_nan() || config.font_size <= 0.0 {
        return invalid("font_size must be positive");
    }
    if let CanvasHeight::Fixed(height) = config.height {
        if height <= 2 * config.margin {
            return invalid("fixed height must exceed both margins");
        }
    }
    if let RowWeighting::Weighted { default, weights } = &config.rows {
        if *default == 0 || weights.iter().any(|(_, w)| *w == 0) {
            return invalid("row weights must be positive");
        }
    }
    Ok(())
}

fn label_column_px(table: &TableData, config: &TableCardConfig) -> Result<u32, RenderError> {
    let ratio_px = |ratio: &Ratio| -> Result<u32, RenderError> {
        if ratio.label == 0 || ratio.content == 0 {
            return Err(RenderError::InvalidConfig(
                "column ratio parts must be positive".into(),
            ));
        }
        let total = u64::from(ratio.label) + u64::from(ratio.content);
        Ok((u64::from(config.width) * u64::from(ratio.label) / total) as u32)
    };

    let px = match &config.split {
        ColumnSplit::Ratio(ratio) => ratio_px(ratio)?,
        ColumnSplit::FixedLabelWidth(px) => *px,
        ColumnSplit::WhenLabelPresent { label, present, absent } => {
            if table.contains_label(label) {
                ratio_px(present)?
            } else {
                ratio_px(absent)?
            }
        }
    };

    if px == 0 || px >= config.width {
        return Err(RenderError::InvalidConfig(format!(
            "label column of {px} px does not fit a {} px canvas",
            config.width
        )));
    }
    Ok(px)
}

/// Characters that fit a column once both paddings are taken off.
fn chars_for(column_px: u32, config: &TableCardConfig) -> usize {
    let usable = column_px.saturating_sub(2 * config.padding);
    ((usable / config.char_width) as usize).max(1)
}

/// Share the area between the margins by row weight. The last row absorbs
/// the rounding remainder so rows always end exactly at the bottom margin.
fn fixed_row_spans(table: &TableData, config: &TableCardConfig, height: u32) -> Vec<(u32, u32)> {
    let weights: Vec<u32> = table.labels().map(|l| config.rows.weight_of(l)).collect();
    let total_weight: u32 = weights.iter().sum();
    if total_weight == 0 {
        return Vec::new();
    }

    let usable = height - 2 * config.margin;
    let unit = usable / total_weight;
    let bottom = height - config.margin;

    let mut spans = Vec::with_capacity(weights.len());
    let mut top = config.margin;
    for (index, weight) in weights.iter().enumerate() {
        let row_height = if index + 1 == weights.len() {
            bottom - top
        } else {
            unit * weight
        };
        spans.push((top, row_height));
        top += row_height;
    }
    spans
}

fn fitted_row_spans(
    blocks: &[(Vec<String>, Vec<String>)],
    config: &TableCardConfig,
) -> (u32, Vec<(u32, u32)>) {
    let mut spans = Vec::with_capacity(blocks.len());
    let mut top = config.margin;
    for (label, content) in blocks {
        let lines = label.len().max(content.len()) as u32;
        let row_height = lines * config.line_height + 2 * config.padding;
        spans.push((top, row_height));
        top += row_height;
    }
    let height = (top + config.margin).max(config.line_height);
    (height, spans)
}

fn text_block(
    lines: Vec<String>,
    x: u32,
    y: u32,
    wrap_width: usize,
    column_px: u32,
    line_budget: Option<usize>,
    config: &TableCardConfig,
) -> TextBlock {
    let (lines, truncated) = match line_budget {
        Some(budget) => truncate_lines(lines, budget, wrap_width, &config.ellipsis),
        None => (lines, false),
    };
    TextBlock {
        x,
        y,
        lines,
        wrap_width,
        column_px,
        truncated,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
