//! One module per function. Each exposes an async `run` taking its
//! collaborators explicitly.

pub mod announce_buffered_article;
pub mod batch_embedding;
pub mod create_blog_og_image;
pub mod create_og_images;
pub mod export_tables;
mod og_card;
pub mod pick_random_article;
pub mod post_to_social;
pub mod report_legendary_articles;
pub mod report_weekly_summary;
pub mod save_social_ids;
pub mod sync_latest_articles;

pub use og_card::CardPublisher;
