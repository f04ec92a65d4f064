//! Queue the latest posts into the content buffer, skipping those already there.

use std::collections::HashSet;

use pressline_core::dedup::filter_unseen;
use pressline_core::site::article_url;
use pressline_core::types::DbId;
use pressline_db::models::content_buffer::BufferEntry;
use pressline_db::repositories::{ContentBufferRepo, PostRepo};
use pressline_db::DbPool;

use crate::error::FunctionResult;

pub const LATEST_LIMIT: i64 = 10;

/// Returns the ids inserted by this run.
pub async fn run(pool: &DbPool, site_base_url: &str) -> FunctionResult<Vec<DbId>> {
    let latest = PostRepo::list_latest(pool, LATEST_LIMIT).await?;
    let buffered: HashSet<DbId> = ContentBufferRepo::list_post_ids(pool).await?.into_iter().collect();
    let fresh = filter_unseen(latest, &buffered, |post| post.post_id);

    if fresh.is_empty() {
        tracing::info!("Nothing inserted");
        return Ok(Vec::new());
    }

    let mut inserted = Vec::with_capacity(fresh.len());
    for post in fresh {
        let entry = BufferEntry {
            post_id: post.post_id,
            post_url: article_url(site_base_url, post.post_id),
            post_title: post.post_title,
        };
        if ContentBufferRepo::insert(pool, &entry).await? {
            tracing::info!(post_id = entry.post_id, title = %entry.post_title, "Buffered article");
            inserted.push(entry.post_id);
        }
    }

    Ok(inserted)
}
