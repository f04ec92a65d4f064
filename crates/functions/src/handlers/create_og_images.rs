//! Cards for every welcomed, unshared post of the last 24 hours.

use chrono::{Duration, Utc};
use serde::Serialize;

use pressline_core::site::is_test_post;
use pressline_core::types::DbId;
use pressline_db::repositories::PostRepo;

use super::og_card::CardPublisher;
use crate::error::FunctionResult;

pub const LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Default, Serialize)]
pub struct OgImageReport {
    pub created: Vec<DbId>,
    pub skipped_test_posts: Vec<DbId>,
}

/// A malformed article body aborts the run; posts handled before it keep
/// their cards.
pub async fn run(cards: &CardPublisher<'_>) -> FunctionResult<OgImageReport> {
    let since = Utc::now() - Duration::hours(LOOKBACK_HOURS);
    let posts = PostRepo::list_unshared_since(cards.pool, since).await?;
    let mut report = OgImageReport::default();

    if posts.is_empty() {
        tracing::info!("There are no posts to create OG images for");
        return Ok(report);
    }

    for post in &posts {
        if is_test_post(&post.post_title) {
            tracing::info!(post_id = post.post_id, "Skipping test post");
            report.skipped_test_posts.push(post.post_id);
            continue;
        }
        cards.publish(post).await?;
        report.created.push(post.post_id);
    }

    Ok(report)
}
