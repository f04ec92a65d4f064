//! Messages exchanged between the publishing functions.
//!
//! - [`Message`]: the tagged records carried on the social-post topic.
//! - [`envelope`]: decoding of the SNS and DynamoDB-stream triggers that
//!   carry them.
//! - [`MessagePublisher`]: the seam handlers publish through, with an SNS
//!   implementation and an in-process broadcast bus.

pub mod envelope;
pub mod error;
pub mod message;
pub mod publisher;

pub use envelope::{buffered_articles, first_sns_message, BufferedArticle, DynamoDbStreamEvent, SnsEvent};
pub use error::EventError;
pub use message::{parse_sns_message, Announcement, Message, SocialPostRecorded};
pub use pressline_core::SocialPlatform;
pub use publisher::{InMemoryPublisher, MessagePublisher, SnsPublisher};
