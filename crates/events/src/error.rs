/// Errors raised while decoding or publishing messages.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The payload is not a message this pipeline understands.
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Message JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Publish failed: {0}")]
    Publish(String),
}
