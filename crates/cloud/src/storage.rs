//! Object storage for rendered images.
//!
//! Public assets live in an S3 bucket addressed by virtual-host URL; blog
//! assets live in Cloudflare R2, reached through the S3 API with a custom
//! endpoint and static credentials.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::Deserialize;

use crate::error::CloudError;

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<StoredObject, CloudError>;
}

fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// Public base URL of an S3 bucket in `region`.
pub fn s3_public_base_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3-{region}.amazonaws.com")
}

// ---------------------------------------------------------------------------
// S3ObjectStore
// ---------------------------------------------------------------------------

/// Credentials and addressing for an R2 bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct R2Config {
    #[serde(rename = "R2_ENDPOINT_URL")]
    pub endpoint_url: String,
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,
    #[serde(rename = "R2_BUCKET_NAME")]
    pub bucket: String,
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// An AWS S3 bucket whose objects are publicly readable.
    pub fn aws(config: &aws_config::SdkConfig, bucket: &str, region: &str) -> Self {
        Self::new(
            aws_sdk_s3::Client::new(config),
            bucket,
            s3_public_base_url(bucket, region),
        )
    }

    /// An R2 bucket served publicly from `public_base_url`.
    pub fn r2(r2: &R2Config, public_base_url: impl Into<String>) -> Self {
        let credentials = Credentials::new(
            r2.access_key_id.clone(),
            r2.secret_access_key.clone(),
            None,
            None,
            "r2-static",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&r2.endpoint_url)
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        Self::new(aws_sdk_s3::Client::from_conf(config), &r2.bucket, public_base_url)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<StoredObject, CloudError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| CloudError::Storage {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let public_url = join_url(&self.public_base_url, key);
        tracing::info!(bucket = %self.bucket, key, size, url = %public_url, "Uploaded object");
        Ok(StoredObject {
            key: key.to_string(),
            public_url,
        })
    }
}

// ---------------------------------------------------------------------------
// InMemoryObjectStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object store kept in memory, with injectable per-key failures.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    public_base_url: String,
    objects: Arc<Mutex<HashMap<String, MemoryObject>>>,
    fail_keys: Arc<Mutex<Vec<String>>>,
}

impl InMemoryObjectStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            objects: Arc::default(),
            fail_keys: Arc::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self
            .objects
            .lock()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Make every later upload of `key` fail.
    pub fn inject_failure(&self, key: impl Into<String>) {
        if let Ok(mut keys) = self.fail_keys.lock() {
            keys.push(key.into());
        }
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<StoredObject, CloudError> {
        let fail = self
            .fail_keys
            .lock()
            .map(|keys| keys.iter().any(|k| k == key))
            .unwrap_or(false);
        if fail {
            return Err(CloudError::Storage {
                key: key.to_string(),
                message: "injected failure".into(),
            });
        }

        let mut objects = self.objects.lock().map_err(|_| CloudError::Storage {
            key: key.to_string(),
            message: "store lock poisoned".into(),
        })?;
        objects.insert(
            key.to_string(),
            MemoryObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(StoredObject {
            key: key.to_string(),
            public_url: join_url(&self.public_base_url, key),
        })
    }
}
