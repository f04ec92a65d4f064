use pressline_cloud::ObjectStore;
use pressline_core::site::article_url;
use pressline_core::{extract_table_data, MessageType};
use pressline_db::models::post::PostContent;
use pressline_db::repositories::PostRepo;
use pressline_db::DbPool;
use pressline_events::{Announcement, Message, MessagePublisher};

use crate::cards::TableCardRenderer;
use crate::error::FunctionResult;

/// Renders an article's card, uploads it, records it on the post and
/// announces the post as new.
pub struct CardPublisher<'a> {
    pub pool: &'a DbPool,
    pub renderer: &'a dyn TableCardRenderer,
    pub store: &'a dyn ObjectStore,
    pub publisher: &'a dyn MessagePublisher,
    pub site_base_url: &'a str,
    /// Stop after the upload.
    pub dry_run: bool,
}

impl CardPublisher<'_> {
    /// Returns the published announcement, or `None` on a dry run.
    pub async fn publish(&self, post: &PostContent) -> FunctionResult<Option<Announcement>> {
        let table = extract_table_data(&post.post_content)?;
        let stem = post.post_id.to_string();
        let path = self.renderer.render_table(&table, &stem)?;

        let bytes = tokio::fs::read(&path).await?;
        let uploaded = self.store.put_object(&format!("{stem}.jpg"), bytes, "image/jpeg").await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove rendered card");
        }
        let stored = uploaded?;

        if self.dry_run {
            tracing::info!(post_id = post.post_id, og_url = %stored.public_url, "Dry run, card uploaded only");
            return Ok(None);
        }

        PostRepo::set_ogp_image_url(self.pool, post.post_id, &stored.public_url).await?;
        PostRepo::mark_sns_shared(self.pool, post.post_id).await?;

        let announcement = Announcement {
            post_title: post.post_title.clone(),
            post_url: article_url(self.site_base_url, post.post_id),
            og_url: stored.public_url,
            message_type: MessageType::New,
            post_id: Some(post.post_id),
        };
        self.publisher.publish(&Message::from(announcement.clone())).await?;

        tracing::info!(post_id = post.post_id, og_url = %announcement.og_url, "Created OG image");
        Ok(Some(announcement))
    }
}
