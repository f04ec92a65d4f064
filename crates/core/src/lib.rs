//! Domain types and pure logic shared by every pressline function.
//!
//! Nothing in this crate performs I/O: HTML table extraction, duplicate
//! suppression, post-text composition and site URL helpers all operate on
//! values handed in by the callers.

pub mod dedup;
pub mod error;
pub mod platform;
pub mod post_text;
pub mod site;
pub mod table_data;
pub mod types;

pub use error::CoreError;
pub use platform::SocialPlatform;
pub use post_text::MessageType;
pub use table_data::{extract_table_data, TableData};
