//! Publishing messages to downstream functions.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::EventError;
use crate::message::Message;

/// Somewhere messages can be sent for downstream consumers.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, message: &Message) -> Result<(), EventError>;
}

// ---------------------------------------------------------------------------
// SnsPublisher
// ---------------------------------------------------------------------------

/// Publishes each message as a JSON string to one SNS topic.
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

#[async_trait]
impl MessagePublisher for SnsPublisher {
    async fn publish(&self, message: &Message) -> Result<(), EventError> {
        let body = serde_json::to_string(message)?;
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(body)
            .send()
            .await
            .map_err(|e| EventError::Publish(aws_sdk_sns::error::DisplayErrorContext(e).to_string()))?;

        tracing::info!(
            topic_arn = %self.topic_arn,
            message_id = output.message_id().unwrap_or_default(),
            "Published message"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InMemoryPublisher
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out publisher backed by a broadcast channel.
///
/// Every published message is also kept in order so tests can inspect what
/// a handler sent without racing a subscriber.
pub struct InMemoryPublisher {
    sender: broadcast::Sender<Message>,
    sent: std::sync::Mutex<Vec<Message>>,
}

impl InMemoryPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Messages published so far, oldest first.
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl MessagePublisher for InMemoryPublisher {
    async fn publish(&self, message: &Message) -> Result<(), EventError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        // Zero receivers is not an error.
        let _ = self.sender.send(message.clone());
        Ok(())
    }
}
