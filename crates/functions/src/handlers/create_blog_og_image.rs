//! Title card for a blog post, requested over HTTP and stored in R2.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pressline_cloud::ObjectStore;

use crate::cards::TitleCardRenderer;
use crate::error::{FunctionError, FunctionResult};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BlogImageRequest {
    #[validate(length(min = 1, message = "post_title must not be empty"))]
    pub post_title: String,
    #[serde(default)]
    pub post_tags: Vec<String>,
    /// Blog post ids are slugs or numbers depending on the blog engine.
    pub post_id: serde_json::Value,
}

impl BlogImageRequest {
    /// Parse and validate a request body.
    pub fn from_body(body: &str) -> FunctionResult<Self> {
        let request: Self =
            serde_json::from_str(body).map_err(|e| FunctionError::BadRequest(format!("Invalid request body: {e}")))?;
        request
            .validate()
            .map_err(|e| FunctionError::BadRequest(e.to_string()))?;
        Ok(request)
    }

    /// File stem derived from `post_id`.
    pub fn stem(&self) -> FunctionResult<String> {
        let stem = match &self.post_id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(FunctionError::BadRequest(format!(
                    "post_id must be a string or a number, got {other}"
                )))
            }
        };
        if stem.is_empty() || stem.contains(['/', '\\']) || stem.starts_with('.') {
            return Err(FunctionError::BadRequest(format!("post_id '{stem}' is not a valid file name")));
        }
        Ok(stem)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogImageResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BlogImageResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            key: None,
            url: None,
        }
    }
}

pub async fn run(
    renderer: &dyn TitleCardRenderer,
    store: &dyn ObjectStore,
    request: &BlogImageRequest,
) -> FunctionResult<BlogImageResponse> {
    let stem = request.stem()?;
    let path = renderer.render_title(&request.post_title, &request.post_tags, &stem)?;

    let bytes = tokio::fs::read(&path).await?;
    let uploaded = store.put_object(&format!("{stem}.png"), bytes, "image/png").await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove rendered card");
    }
    let stored = uploaded?;

    tracing::info!(key = %stored.key, url = %stored.public_url, "Uploaded blog OG image");
    Ok(BlogImageResponse {
        status: "success",
        message: "画像をR2にアップロードしました".into(),
        key: Some(stored.key),
        url: Some(stored.public_url),
    })
}
