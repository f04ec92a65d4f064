//! Queries and single-row updates on `dim_posts`.
//!
//! `content_embedding` is a pgvector column. Runtime queries cannot bind a
//! vector type, so embeddings travel as text literals cast in SQL.

use sqlx::PgPool;

use pressline_core::types::{DbId, Timestamp};
use pressline_core::SocialPlatform;

use crate::models::post::{EmbeddingUpdate, PopularPost, PostContent, PostSummary};

const CONTENT_COLUMNS: &str = "post_id, post_title, post_content";

pub struct PostRepo;

impl PostRepo {
    // -----------------------------------------------------------------------
    // Embeddings
    // -----------------------------------------------------------------------

    /// Ids of posts without an embedding, lowest first.
    pub async fn list_missing_embedding(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT post_id FROM dim_posts WHERE content_embedding IS NULL ORDER BY post_id",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn get_content(pool: &PgPool, post_id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT post_content FROM dim_posts WHERE post_id = $1")
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_embedding(
        pool: &PgPool,
        post_id: DbId,
        update: &EmbeddingUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE dim_posts SET content_embedding = $2::vector, token_count = $3 \
             WHERE post_id = $1",
        )
        .bind(post_id)
        .bind(update.vector_literal())
        .bind(update.token_count)
        .execute(pool)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // OG images
    // -----------------------------------------------------------------------

    /// Welcomed posts published at or after `since` that were never shared.
    pub async fn list_unshared_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<PostContent>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM dim_posts \
             WHERE post_date_gmt >= $1 AND is_sns_shared = FALSE AND is_welcomed = TRUE \
             ORDER BY post_date_gmt"
        );
        sqlx::query_as::<_, PostContent>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    pub async fn get_content_for_card(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Option<PostContent>, sqlx::Error> {
        let query = format!("SELECT {CONTENT_COLUMNS} FROM dim_posts WHERE post_id = $1");
        sqlx::query_as::<_, PostContent>(&query)
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_ogp_image_url(pool: &PgPool, post_id: DbId, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE dim_posts SET ogp_image_url = $2 WHERE post_id = $1")
            .bind(post_id)
            .bind(url)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn mark_sns_shared(pool: &PgPool, post_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE dim_posts SET is_sns_shared = TRUE WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Random pick
    // -----------------------------------------------------------------------

    /// One never-picked post with at least `min_likes` likes, chosen at random.
    pub async fn pick_unpicked_popular(
        pool: &PgPool,
        min_likes: i32,
    ) -> Result<Option<PopularPost>, sqlx::Error> {
        sqlx::query_as::<_, PopularPost>(
            "SELECT post_id, post_title, ogp_image_url FROM dim_posts \
             WHERE is_sns_pickuped = FALSE AND count_likes >= $1 \
             ORDER BY random() LIMIT 1",
        )
        .bind(min_likes)
        .fetch_optional(pool)
        .await
    }

    pub async fn mark_sns_pickuped(pool: &PgPool, post_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE dim_posts SET is_sns_pickuped = TRUE WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Social ids
    // -----------------------------------------------------------------------

    /// Store the id of the first post made on `platform` for this article.
    ///
    /// Returns `false` when no such post exists.
    pub async fn set_social_post_id(
        pool: &PgPool,
        platform: SocialPlatform,
        post_id: DbId,
        social_post_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("UPDATE dim_posts SET {} = $2 WHERE post_id = $1", platform.column());
        let result = sqlx::query(&query)
            .bind(post_id)
            .bind(social_post_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_social_post_id(
        pool: &PgPool,
        platform: SocialPlatform,
        post_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let query = format!("SELECT {} FROM dim_posts WHERE post_id = $1", platform.column());
        let value: Option<Option<String>> = sqlx::query_scalar(&query)
            .bind(post_id)
            .fetch_optional(pool)
            .await?;
        Ok(value.flatten())
    }

    // -----------------------------------------------------------------------
    // Latest
    // -----------------------------------------------------------------------

    /// The `limit` most recently published posts, newest first.
    pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<PostSummary>, sqlx::Error> {
        sqlx::query_as::<_, PostSummary>(
            "SELECT post_id, post_title, post_date_gmt FROM dim_posts \
             ORDER BY post_date_gmt DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
