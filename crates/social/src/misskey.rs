//! Misskey: drive upload and note creation with an API token.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::SocialError;
use crate::http::parse_response;

const SERVICE: &str = "Misskey";
pub const DEFAULT_INSTANCE: &str = "https://misskey.io";

#[derive(Debug, Clone, Deserialize)]
pub struct MisskeyCredentials {
    #[serde(rename = "MISSKEY_IO_TOKEN")]
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteResponse {
    created_note: Note,
}

#[derive(Debug, Deserialize)]
struct Note {
    id: String,
}

pub struct MisskeyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MisskeyClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, credentials: MisskeyCredentials) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: credentials.token,
        }
    }

    /// Upload a file to the drive and return its id.
    pub async fn upload_file(&self, bytes: Vec<u8>, filename: &str, mime: &str) -> Result<String, SocialError> {
        let part = Part::bytes(bytes).file_name(filename.to_string()).mime_str(mime)?;
        let form = Form::new().text("i", self.token.clone()).part("file", part);

        let response = self
            .http
            .post(format!("{}/api/drive/files/create", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let file: DriveFile = parse_response(SERVICE, response).await?;
        Ok(file.id)
    }

    /// Create a note and return its id.
    pub async fn create_note(&self, text: &str, file_ids: &[String]) -> Result<String, SocialError> {
        let mut body = serde_json::json!({ "i": self.token, "text": text });
        if !file_ids.is_empty() {
            body["fileIds"] = serde_json::json!(file_ids);
        }

        let response = self
            .http
            .post(format!("{}/api/notes/create", self.base_url))
            .json(&body)
            .send()
            .await?;

        let created: CreateNoteResponse = parse_response(SERVICE, response).await?;
        tracing::info!(note_id = %created.created_note.id, "Created Misskey note");
        Ok(created.created_note.id)
    }
}
