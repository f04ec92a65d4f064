//! Records published on the social-post topic.
//!
//! Two kinds travel on the same topic and are told apart by their fields:
//! an [`Announcement`] carries `message_type`, a [`SocialPostRecorded`]
//! carries `social_type`.

use serde::{Deserialize, Serialize};

use pressline_core::types::DbId;
use pressline_core::{MessageType, SocialPlatform};

use crate::error::EventError;

// ---------------------------------------------------------------------------
// Announcement
// ---------------------------------------------------------------------------

/// A post to be cross-posted to every social platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub post_title: String,
    pub post_url: String,
    pub og_url: String,
    pub message_type: MessageType,
    /// Absent for `random` picks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<DbId>,
}

impl Announcement {
    /// Whether posters should report the resulting social post id.
    pub fn records_social_ids(&self) -> bool {
        self.message_type == MessageType::New && self.post_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// SocialPostRecorded
// ---------------------------------------------------------------------------

/// A platform post id to be written back to its article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPostRecorded {
    pub post_id: DbId,
    pub social_type: SocialPlatform,
    pub social_post_id: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Announcement(Announcement),
    SocialPostRecorded(SocialPostRecorded),
}

impl From<Announcement> for Message {
    fn from(value: Announcement) -> Self {
        Self::Announcement(value)
    }
}

impl From<SocialPostRecorded> for Message {
    fn from(value: SocialPostRecorded) -> Self {
        Self::SocialPostRecorded(value)
    }
}

impl Message {
    /// Decode a JSON object into the record kind its fields identify.
    pub fn from_value(value: serde_json::Value) -> Result<Self, EventError> {
        let object = value
            .as_object()
            .ok_or_else(|| EventError::Malformed(format!("expected a JSON object, got {value}")))?;

        if object.contains_key("social_type") {
            Ok(Self::SocialPostRecorded(serde_json::from_value(value)?))
        } else if object.contains_key("message_type") {
            Ok(Self::Announcement(serde_json::from_value(value)?))
        } else {
            Err(EventError::Malformed(
                "message has neither message_type nor social_type".into(),
            ))
        }
    }

    pub fn into_announcement(self) -> Result<Announcement, EventError> {
        match self {
            Self::Announcement(a) => Ok(a),
            Self::SocialPostRecorded(_) => Err(EventError::Malformed(
                "expected an announcement, got a social post record".into(),
            )),
        }
    }

    pub fn into_social_post_recorded(self) -> Result<SocialPostRecorded, EventError> {
        match self {
            Self::SocialPostRecorded(r) => Ok(r),
            Self::Announcement(_) => Err(EventError::Malformed(
                "expected a social post record, got an announcement".into(),
            )),
        }
    }
}

/// Decode the `Message` field of an SNS record.
///
/// SNS delivers the published body as a JSON-encoded string; direct
/// invocations may pass the object itself. Both are accepted.
pub fn parse_sns_message(raw: &serde_json::Value) -> Result<Message, EventError> {
    match raw {
        serde_json::Value::String(body) => Message::from_value(serde_json::from_str(body)?),
        serde_json::Value::Object(_) => Message::from_value(raw.clone()),
        other => Err(EventError::Malformed(format!(
            "SNS Message must be a string or an object, got {other}"
        ))),
    }
}
