use sqlx::PgPool;

use pressline_core::types::DbId;

pub struct PostTagRepo;

impl PostTagRepo {
    /// Tag a post. Attaching an existing tag is a no-op returning `false`.
    pub async fn attach(pool: &PgPool, post_id: DbId, tag_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO rel_post_tags (post_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT (post_id, tag_id) DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_tag_ids(pool: &PgPool, post_id: DbId) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT tag_id FROM rel_post_tags WHERE post_id = $1 ORDER BY tag_id")
            .bind(post_id)
            .fetch_all(pool)
            .await
    }
}
