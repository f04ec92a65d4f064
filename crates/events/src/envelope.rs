//! Decoding of the trigger payloads Lambda delivers.
//!
//! The event shapes themselves come from `aws_lambda_events`; this module
//! only pulls the pipeline's records out of them.

use serde_json::Value;

use pressline_core::types::DbId;

pub use aws_lambda_events::event::dynamodb::{Event as DynamoDbStreamEvent, EventRecord};
pub use aws_lambda_events::event::sns::SnsEvent;

use crate::error::EventError;
use crate::message::{parse_sns_message, Message};

// ---------------------------------------------------------------------------
// SNS
// ---------------------------------------------------------------------------

/// Decode the message of the first record. Each invocation handles one.
pub fn first_sns_message(event: &SnsEvent) -> Result<Message, EventError> {
    let record = event
        .records
        .first()
        .ok_or_else(|| EventError::Malformed("SNS event has no records".into()))?;
    parse_sns_message(&Value::String(record.sns.message.clone()))
}

// ---------------------------------------------------------------------------
// DynamoDB stream
// ---------------------------------------------------------------------------

/// A content-buffer row announced through the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedArticle {
    pub post_id: DbId,
    pub post_title: String,
    pub post_url: String,
}

/// Articles of every `INSERT` record, in stream order.
pub fn buffered_articles(event: &DynamoDbStreamEvent) -> Result<Vec<BufferedArticle>, EventError> {
    let mut articles = Vec::new();
    for record in &event.records {
        if let Some(article) = buffered_article(record)? {
            articles.push(article);
        }
    }
    Ok(articles)
}

/// Decode the inserted article, or `None` for non-`INSERT` records.
pub fn buffered_article(record: &EventRecord) -> Result<Option<BufferedArticle>, EventError> {
    if record.event_name != "INSERT" {
        return Ok(None);
    }

    let keys = serde_json::to_value(&record.change.keys)?;
    let post_id = scalar(&keys["post_id"], "N")
        .or_else(|| scalar(&keys["post_id"], "S"))
        .ok_or_else(|| EventError::Malformed("stream record has no post_id key".into()))?;
    let post_id = post_id
        .parse::<DbId>()
        .map_err(|_| EventError::Malformed(format!("post_id '{post_id}' is not a number")))?;

    let image = serde_json::to_value(&record.change.new_image)?;
    Ok(Some(BufferedArticle {
        post_id,
        post_title: image_string(&image, "post_title")?,
        post_url: image_string(&image, "post_url")?,
    }))
}

/// The string under a DynamoDB type tag (`{"S": "..."}`, `{"N": "..."}`).
fn scalar<'a>(attribute: &'a Value, tag: &str) -> Option<&'a str> {
    attribute.get(tag).and_then(Value::as_str)
}

fn image_string(image: &Value, field: &str) -> Result<String, EventError> {
    scalar(&image[field], "S")
        .map(str::to_string)
        .ok_or_else(|| EventError::Malformed(format!("stream record NewImage has no '{field}'")))
}
