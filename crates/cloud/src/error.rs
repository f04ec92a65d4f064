#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// The secret exists but does not have the expected shape.
    #[error("Secret '{id}' is malformed: {source}")]
    SecretFormat {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Secrets Manager request failed: {0}")]
    Secrets(String),

    #[error("Object storage request failed for '{key}': {message}")]
    Storage { key: String, message: String },
}
