//! Re-announce one well-liked post that was never picked before.

use pressline_core::site::article_url;
use pressline_core::{CoreError, MessageType};
use pressline_db::repositories::PostRepo;
use pressline_db::DbPool;
use pressline_events::{Announcement, Message, MessagePublisher};

use crate::error::FunctionResult;

pub const MIN_LIKES: i32 = 10;

/// Returns the announcement, or `None` when no post qualifies.
pub async fn run(
    pool: &DbPool,
    publisher: &dyn MessagePublisher,
    site_base_url: &str,
) -> FunctionResult<Option<Announcement>> {
    let Some(post) = PostRepo::pick_unpicked_popular(pool, MIN_LIKES).await? else {
        tracing::info!(min_likes = MIN_LIKES, "No unpicked post qualifies");
        return Ok(None);
    };

    let og_url = post.ogp_image_url.ok_or_else(|| {
        CoreError::Validation(format!("post {} has no OG image to share", post.post_id))
    })?;

    PostRepo::mark_sns_pickuped(pool, post.post_id).await?;

    let announcement = Announcement {
        post_title: post.post_title,
        post_url: article_url(site_base_url, post.post_id),
        og_url,
        message_type: MessageType::Random,
        post_id: None,
    };
    publisher.publish(&Message::from(announcement.clone())).await?;

    tracing::info!(post_id = post.post_id, "Article picked up");
    Ok(Some(announcement))
}
