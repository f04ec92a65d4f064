//! The content buffer: articles already queued for announcement.

use sqlx::PgPool;

use pressline_core::types::DbId;

use crate::models::content_buffer::BufferEntry;

pub struct ContentBufferRepo;

impl ContentBufferRepo {
    /// Every post id already in the buffer.
    pub async fn list_post_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT post_id FROM content_buffer")
            .fetch_all(pool)
            .await
    }

    /// Insert an entry. Returns `false` if the post was already buffered.
    pub async fn insert(pool: &PgPool, entry: &BufferEntry) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO content_buffer (post_id, post_title, post_url) VALUES ($1, $2, $3) \
             ON CONFLICT (post_id) DO NOTHING",
        )
        .bind(entry.post_id)
        .bind(&entry.post_title)
        .bind(&entry.post_url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
