//! OpenAI embeddings endpoint.

use serde::{Deserialize, Serialize};

use crate::error::SocialError;
use crate::http::parse_response;

const SERVICE: &str = "OpenAI";
pub const API_BASE: &str = "https://api.openai.com/v1";
pub const EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiCredentials {
    #[serde(rename = "OPENAI_API_KEY")]
    pub api_key: String,
}

/// Embedding vector plus the number of tokens billed for the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub token_count: i32,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    usage: Usage,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: i32,
}

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, credentials: OpenAiCredentials) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: credentials.api_key,
        }
    }

    pub async fn embed(&self, input: &str) -> Result<Embedding, SocialError> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input,
                model: EMBEDDING_MODEL,
            })
            .send()
            .await?;

        let body: EmbeddingResponse = parse_response(SERVICE, response).await?;
        let vector = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| SocialError::UnexpectedResponse {
                service: SERVICE,
                message: "embedding response has no data".into(),
            })?;

        Ok(Embedding {
            vector,
            token_count: body.usage.total_tokens,
        })
    }
}
