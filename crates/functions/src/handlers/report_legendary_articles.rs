//! Tag and tweet posts that just became legendary.

use serde::Deserialize;

use pressline_core::post_text::legendary_text;
use pressline_core::site::article_url;
use pressline_core::types::DbId;
use pressline_db::repositories::PostTagRepo;
use pressline_db::DbPool;
use pressline_social::bigquery::BigQueryClient;
use pressline_social::{SocialPost, SocialPoster};

use crate::error::FunctionResult;

/// Tag id of the legendary (殿堂入り) tag.
pub const LEGENDARY_TAG_ID: i32 = 575;

#[derive(Debug, Clone, Deserialize)]
pub struct LegendaryPost {
    pub post_id: DbId,
    pub post_title: String,
}

pub fn legendary_query(report_dataset: &str) -> String {
    format!("SELECT post_id, post_title FROM `{report_dataset}.report_new_legend_posts`")
}

/// Every post is tagged before any is tweeted.
pub async fn run(
    warehouse: &BigQueryClient,
    pool: &DbPool,
    twitter: &dyn SocialPoster,
    report_dataset: &str,
    site_base_url: &str,
) -> FunctionResult<Vec<DbId>> {
    let posts: Vec<LegendaryPost> = warehouse.query(&legendary_query(report_dataset)).await?;

    for post in &posts {
        PostTagRepo::attach(pool, post.post_id, LEGENDARY_TAG_ID).await?;
    }

    for post in &posts {
        let text = legendary_text(&post.post_title, &article_url(site_base_url, post.post_id));
        let tweet_id = twitter.post(&SocialPost::text(text)).await?;
        tracing::info!(post_id = post.post_id, tweet_id = %tweet_id, "Announced legendary article");
    }

    tracing::info!(count = posts.len(), "Legendary articles updated");
    Ok(posts.into_iter().map(|p| p.post_id).collect())
}
