//! Write a platform post id back to its article.

use pressline_db::repositories::PostRepo;
use pressline_db::DbPool;
use pressline_events::SocialPostRecorded;

use crate::error::FunctionResult;

/// Returns `false` when no post has the recorded id.
pub async fn run(pool: &DbPool, record: &SocialPostRecorded) -> FunctionResult<bool> {
    let updated =
        PostRepo::set_social_post_id(pool, record.social_type, record.post_id, &record.social_post_id).await?;

    if updated {
        tracing::info!(
            post_id = record.post_id,
            social_type = %record.social_type,
            column = record.social_type.column(),
            social_post_id = %record.social_post_id,
            "Saved social post id"
        );
    } else {
        tracing::warn!(
            post_id = record.post_id,
            social_type = %record.social_type,
            "No post to attach the social post id to"
        );
    }
    Ok(updated)
}
