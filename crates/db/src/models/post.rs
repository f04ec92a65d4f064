//! Row shapes read from `dim_posts`.

use serde::Serialize;
use sqlx::FromRow;

use pressline_core::types::{DbId, Timestamp};

/// Id and title, for the latest-articles sync.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub post_id: DbId,
    pub post_title: String,
    pub post_date_gmt: Timestamp,
}

/// The HTML body of a post together with its title, for card rendering.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostContent {
    pub post_id: DbId,
    pub post_title: String,
    pub post_content: String,
}

/// A well-liked post eligible for a random pick.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PopularPost {
    pub post_id: DbId,
    pub post_title: String,
    pub ogp_image_url: Option<String>,
}

/// Result of one embedding request.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingUpdate {
    pub embedding: Vec<f32>,
    pub token_count: i32,
}

impl EmbeddingUpdate {
    /// pgvector text literal, e.g. `[0.1,0.2]`.
    pub fn vector_literal(&self) -> String {
        format!(
            "[{}]",
            self.embedding
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}
