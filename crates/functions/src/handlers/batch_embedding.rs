//! Embeddings for every post that lacks one.

use serde::Serialize;

use pressline_core::types::DbId;
use pressline_core::CoreError;
use pressline_db::models::post::EmbeddingUpdate;
use pressline_db::repositories::PostRepo;
use pressline_db::DbPool;
use pressline_social::openai::OpenAiClient;

use crate::error::FunctionResult;

#[derive(Debug, Default, Serialize)]
pub struct EmbeddingReport {
    pub embedded: Vec<DbId>,
    pub failed: Vec<DbId>,
}

/// Embed posts one at a time. A failure is logged and the loop moves on;
/// only the initial listing can fail the run.
pub async fn run(pool: &DbPool, openai: &OpenAiClient) -> FunctionResult<EmbeddingReport> {
    let post_ids = PostRepo::list_missing_embedding(pool).await?;
    tracing::info!(count = post_ids.len(), "Posts missing embeddings");

    let mut report = EmbeddingReport::default();
    for post_id in post_ids {
        match embed_post(pool, openai, post_id).await {
            Ok(token_count) => {
                tracing::info!(post_id, token_count, "Stored embedding");
                report.embedded.push(post_id);
            }
            Err(e) => {
                tracing::error!(post_id, error = %e, "Embedding failed");
                report.failed.push(post_id);
            }
        }
    }

    Ok(report)
}

async fn embed_post(pool: &DbPool, openai: &OpenAiClient, post_id: DbId) -> FunctionResult<i32> {
    let content = PostRepo::get_content(pool, post_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "post",
            id: post_id,
        })?;

    let embedding = openai.embed(&content).await?;
    let update = EmbeddingUpdate {
        embedding: embedding.vector,
        token_count: embedding.token_count,
    };
    PostRepo::set_embedding(pool, post_id, &update).await?;
    Ok(update.token_count)
}
