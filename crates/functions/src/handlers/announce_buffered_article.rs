//! Card and announcement for articles newly inserted into the content buffer.

use pressline_core::site::is_test_post;
use pressline_core::types::DbId;
use pressline_core::CoreError;
use pressline_db::repositories::PostRepo;
use pressline_events::BufferedArticle;

use super::og_card::CardPublisher;
use crate::error::FunctionResult;

/// Announce each article in turn. Returns the ids that were announced.
pub async fn run(cards: &CardPublisher<'_>, articles: &[BufferedArticle]) -> FunctionResult<Vec<DbId>> {
    let mut announced = Vec::with_capacity(articles.len());

    for article in articles {
        if is_test_post(&article.post_title) {
            tracing::info!(post_id = article.post_id, "Skipping test post");
            continue;
        }

        let post = PostRepo::get_content_for_card(cards.pool, article.post_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "post",
                id: article.post_id,
            })?;
        cards.publish(&post).await?;
        announced.push(article.post_id);
    }

    Ok(announced)
}
