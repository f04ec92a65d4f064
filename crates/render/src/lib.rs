//! OG-image rendering.
//!
//! Two card styles are produced:
//!
//! - The table card ([`render_table_card`]): the article summary table laid
//!   out as a label column and a content column, with wrapped and truncated
//!   text and separator lines. Geometry comes from [`compute_layout`], which
//!   never touches a font and can be tested on its own.
//! - The blog card ([`title_card::render_title_card`]): tag pills, a wrapped
//!   title and the author credit.

pub mod error;
pub mod font;
pub mod layout;
pub mod output;
pub mod raster;
pub mod title_card;
pub mod wrap;

pub use error::RenderError;
pub use font::FontResource;
pub use layout::{compute_layout, TableCardConfig, TableLayout};
pub use output::{save_jpeg, save_png, JPEG_QUALITY};
pub use raster::render_table_card;
pub use title_card::{render_title_card, TitleCardConfig, TitleCardFonts};
