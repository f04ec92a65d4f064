//! Twitter/X: v1.1 media upload plus v2 tweet creation, both signed with
//! OAuth 1.0a user context.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::SocialError;
use crate::http::parse_response;
use crate::oauth1::{authorization_header_now, OAuth1Credentials};

const SERVICE: &str = "Twitter";
pub const API_BASE: &str = "https://api.twitter.com";
pub const UPLOAD_BASE: &str = "https://upload.twitter.com";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

pub struct TwitterClient {
    http: reqwest::Client,
    credentials: OAuth1Credentials,
    api_base: String,
    upload_base: String,
}

impl TwitterClient {
    pub fn new(http: reqwest::Client, credentials: OAuth1Credentials) -> Self {
        Self::with_base_urls(http, credentials, API_BASE, UPLOAD_BASE)
    }

    pub fn with_base_urls(
        http: reqwest::Client,
        credentials: OAuth1Credentials,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            api_base: api_base.into(),
            upload_base: upload_base.into(),
        }
    }

    /// Upload an image and return its media id.
    pub async fn upload_media(&self, bytes: Vec<u8>, filename: &str, mime: &str) -> Result<String, SocialError> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base);
        let part = Part::bytes(bytes).file_name(filename.to_string()).mime_str(mime)?;
        let form = Form::new().part("media", part);

        let response = self
            .http
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                authorization_header_now(&self.credentials, "POST", &url, &[]),
            )
            .multipart(form)
            .send()
            .await?;

        let uploaded: MediaUploadResponse = parse_response(SERVICE, response).await?;
        tracing::debug!(media_id = %uploaded.media_id_string, "Uploaded media to Twitter");
        Ok(uploaded.media_id_string)
    }

    /// Create a tweet and return its id.
    pub async fn create_tweet(&self, text: &str, media_ids: &[String]) -> Result<String, SocialError> {
        let url = format!("{}/2/tweets", self.api_base);
        let mut body = serde_json::json!({ "text": text });
        if !media_ids.is_empty() {
            body["media"] = serde_json::json!({ "media_ids": media_ids });
        }

        let response = self
            .http
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                authorization_header_now(&self.credentials, "POST", &url, &[]),
            )
            .json(&body)
            .send()
            .await?;

        let created: CreateTweetResponse = parse_response(SERVICE, response).await?;
        tracing::info!(tweet_id = %created.data.id, "Created tweet");
        Ok(created.data.id)
    }
}
