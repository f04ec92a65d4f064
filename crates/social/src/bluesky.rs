//! Bluesky over the AT Protocol XRPC endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::SocialError;
use crate::http::parse_response;

const SERVICE: &str = "Bluesky";
pub const DEFAULT_SERVICE: &str = "https://bsky.social";
const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Clone, Deserialize)]
pub struct BlueskyCredentials {
    #[serde(rename = "useraddress")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueskySession {
    pub access_jwt: String,
    pub did: String,
}

/// Link card shown under the post.
#[derive(Debug, Clone)]
pub struct ExternalEmbed {
    pub uri: String,
    pub title: String,
    pub description: String,
    /// Blob reference returned by [`BlueskyClient::upload_blob`].
    pub thumb: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UploadBlobResponse {
    blob: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

pub struct BlueskyClient {
    http: reqwest::Client,
    service: String,
}

impl BlueskyClient {
    pub fn new(http: reqwest::Client, service: impl Into<String>) -> Self {
        Self {
            http,
            service: service.into(),
        }
    }

    fn xrpc(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.service)
    }

    pub async fn create_session(&self, credentials: &BlueskyCredentials) -> Result<BlueskySession, SocialError> {
        let response = self
            .http
            .post(self.xrpc("com.atproto.server.createSession"))
            .json(&serde_json::json!({
                "identifier": credentials.identifier,
                "password": credentials.password,
            }))
            .send()
            .await?;
        parse_response(SERVICE, response).await
    }

    /// Upload raw bytes and return the blob reference.
    pub async fn upload_blob(
        &self,
        session: &BlueskySession,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<serde_json::Value, SocialError> {
        let response = self
            .http
            .post(self.xrpc("com.atproto.repo.uploadBlob"))
            .bearer_auth(&session.access_jwt)
            .header(reqwest::header::CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await?;
        let uploaded: UploadBlobResponse = parse_response(SERVICE, response).await?;
        Ok(uploaded.blob)
    }

    /// Create a post with an optional link card and return its AT URI.
    pub async fn create_post(
        &self,
        session: &BlueskySession,
        text: &str,
        embed: Option<&ExternalEmbed>,
        created_at: DateTime<Utc>,
    ) -> Result<String, SocialError> {
        let record = post_record(text, embed, created_at);
        let response = self
            .http
            .post(self.xrpc("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&serde_json::json!({
                "repo": session.did,
                "collection": POST_COLLECTION,
                "record": record,
            }))
            .send()
            .await?;

        let created: CreateRecordResponse = parse_response(SERVICE, response).await?;
        tracing::info!(uri = %created.uri, "Created Bluesky post");
        Ok(created.uri)
    }
}

fn post_record(text: &str, embed: Option<&ExternalEmbed>, created_at: DateTime<Utc>) -> serde_json::Value {
    let mut record = serde_json::json!({
        "$type": POST_COLLECTION,
        "text": text,
        "createdAt": created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    if let Some(embed) = embed {
        let mut external = serde_json::json!({
            "uri": embed.uri,
            "title": embed.title,
            "description": embed.description,
        });
        if let Some(thumb) = &embed.thumb {
            external["thumb"] = thumb.clone();
        }
        record["embed"] = serde_json::json!({
            "$type": "app.bsky.embed.external",
            "external": external,
        });
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_carries_external_card() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let embed = ExternalEmbed {
            uri: "https://healthy-person-emulator.org/archives/1".into(),
            title: "題".into(),
            description: String::new(),
            thumb: Some(serde_json::json!({"$type": "blob", "size": 10})),
        };
        let record = post_record("【新規記事】 : 題", Some(&embed), at);

        assert_eq!(record["createdAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(record["embed"]["$type"], "app.bsky.embed.external");
        assert_eq!(record["embed"]["external"]["thumb"]["size"], 10);
    }

    #[test]
    fn record_without_embed_is_plain_text() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = post_record("hi", None, at);
        assert!(record.get("embed").is_none());
    }
}
