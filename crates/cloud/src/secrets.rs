//! Named credential bundles.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::de::DeserializeOwned;

use crate::error::CloudError;

/// A store of JSON secrets addressed by id.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_json(&self, id: &str) -> Result<serde_json::Value, CloudError>;
}

/// Fetch secret `id` and decode it into `T`.
pub async fn load_secret<T: DeserializeOwned>(store: &dyn SecretStore, id: &str) -> Result<T, CloudError> {
    let value = store.get_json(id).await?;
    serde_json::from_value(value).map_err(|source| CloudError::SecretFormat {
        id: id.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// SecretsManagerStore
// ---------------------------------------------------------------------------

pub struct SecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_secretsmanager::Client::new(config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_json(&self, id: &str) -> Result<serde_json::Value, CloudError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(id)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception());
                if not_found {
                    CloudError::SecretNotFound(id.to_string())
                } else {
                    CloudError::Secrets(DisplayErrorContext(&e).to_string())
                }
            })?;

        let body = output
            .secret_string()
            .ok_or_else(|| CloudError::Secrets(format!("secret '{id}' has no string value")))?;

        tracing::debug!(secret_id = id, "Fetched secret");
        serde_json::from_str(body).map_err(|source| CloudError::SecretFormat {
            id: id.to_string(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// StaticSecretStore
// ---------------------------------------------------------------------------

/// Fixed secrets held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, serde_json::Value>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: serde_json::Value) -> Self {
        self.secrets.insert(id.into(), value);
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_json(&self, id: &str) -> Result<serde_json::Value, CloudError> {
        self.secrets
            .get(id)
            .cloned()
            .ok_or_else(|| CloudError::SecretNotFound(id.to_string()))
    }
}
