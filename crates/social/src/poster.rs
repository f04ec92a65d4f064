//! One interface over the three cross-posting targets.

use async_trait::async_trait;
use pressline_core::SocialPlatform;

use crate::bluesky::{BlueskyClient, BlueskyCredentials, ExternalEmbed};
use crate::error::SocialError;
use crate::misskey::MisskeyClient;
use crate::twitter::TwitterClient;

/// Image attached to a post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Link preview, used by platforms that do not unfurl URLs from the text.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCard {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocialPost {
    pub text: String,
    pub image: Option<PostImage>,
    pub link: Option<LinkCard>,
}

impl SocialPost {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
            link: None,
        }
    }

    pub fn with_image(mut self, image: PostImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_link(mut self, uri: impl Into<String>, title: impl Into<String>) -> Self {
        self.link = Some(LinkCard {
            uri: uri.into(),
            title: title.into(),
        });
        self
    }
}

#[async_trait]
pub trait SocialPoster: Send + Sync {
    fn platform(&self) -> SocialPlatform;

    /// Publish `post` and return the platform's identifier for it.
    async fn post(&self, post: &SocialPost) -> Result<String, SocialError>;
}

pub struct TwitterPoster {
    client: TwitterClient,
}

impl TwitterPoster {
    pub fn new(client: TwitterClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SocialPoster for TwitterPoster {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Twitter
    }

    async fn post(&self, post: &SocialPost) -> Result<String, SocialError> {
        let mut media_ids = Vec::new();
        if let Some(image) = &post.image {
            let id = self
                .client
                .upload_media(image.bytes.clone(), &image.filename, &image.content_type)
                .await?;
            media_ids.push(id);
        }
        self.client.create_tweet(&post.text, &media_ids).await
    }
}

pub struct MisskeyPoster {
    client: MisskeyClient,
}

impl MisskeyPoster {
    pub fn new(client: MisskeyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SocialPoster for MisskeyPoster {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Misskey
    }

    async fn post(&self, post: &SocialPost) -> Result<String, SocialError> {
        let mut file_ids = Vec::new();
        if let Some(image) = &post.image {
            let id = self
                .client
                .upload_file(image.bytes.clone(), &image.filename, &image.content_type)
                .await?;
            file_ids.push(id);
        }
        self.client.create_note(&post.text, &file_ids).await
    }
}

/// Logs in on every post; sessions are not cached between invocations.
pub struct BlueskyPoster {
    client: BlueskyClient,
    credentials: BlueskyCredentials,
}

impl BlueskyPoster {
    pub fn new(client: BlueskyClient, credentials: BlueskyCredentials) -> Self {
        Self { client, credentials }
    }
}

#[async_trait]
impl SocialPoster for BlueskyPoster {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Bluesky
    }

    async fn post(&self, post: &SocialPost) -> Result<String, SocialError> {
        let session = self.client.create_session(&self.credentials).await?;

        let thumb = match &post.image {
            Some(image) => Some(
                self.client
                    .upload_blob(&session, image.bytes.clone(), &image.content_type)
                    .await?,
            ),
            None => None,
        };

        let embed = post.link.as_ref().map(|link| ExternalEmbed {
            uri: link.uri.clone(),
            title: link.title.clone(),
            description: String::new(),
            thumb: thumb.clone(),
        });

        self.client
            .create_post(&session, &post.text, embed.as_ref(), chrono::Utc::now())
            .await
    }
}
