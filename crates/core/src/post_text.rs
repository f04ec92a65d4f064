//! Text composition for social posts.
//!
//! The three platform posters share one announcement format; the weekly and
//! legendary reports have their own layouts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Site name appended to every announcement.
pub const SITE_NAME: &str = "健常者エミュレータ事例集";

/// Header line of the weekly summary post.
pub const WEEKLY_SUMMARY_HEADER: &str = "【今週の人気投稿】";

/// Maximum number of posts listed in the weekly summary.
pub const WEEKLY_SUMMARY_LIMIT: usize = 3;

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// Why a post is being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    New,
    Legendary,
    Random,
}

impl MessageType {
    /// Bracketed prefix used in announcement text.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::New => "新規記事",
            Self::Legendary => "殿堂入り",
            Self::Random => "ランダム",
        }
    }

    /// Wire name (`"new"`, `"legendary"`, `"random"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Legendary => "legendary",
            Self::Random => "random",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "new" => Ok(Self::New),
            "legendary" => Ok(Self::Legendary),
            "random" => Ok(Self::Random),
            other => Err(CoreError::Validation(format!(
                "Unknown message type '{other}'. Must be one of: new, legendary, random"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Text builders
// ---------------------------------------------------------------------------

/// Announcement used by the Twitter/X and Misskey posters.
pub fn announcement_text(title: &str, url: &str, message_type: MessageType) -> String {
    format!("[{}] : {title} {SITE_NAME}\n{url}", message_type.prefix())
}

/// Bluesky text; the link travels in the external embed instead.
pub fn bluesky_text(title: &str) -> String {
    format!("【新規記事】 : {title}")
}

/// Text-only tweet for a post that has just become legendary.
pub fn legendary_text(title: &str, url: &str) -> String {
    format!("[殿堂入り] : {title} {SITE_NAME} \n{url}")
}

/// One ranked entry of the weekly summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub title: String,
    pub url: String,
}

/// Weekly summary listing at most [`WEEKLY_SUMMARY_LIMIT`] posts.
pub fn weekly_summary_text(entries: &[SummaryEntry]) -> String {
    let mut text = format!("{WEEKLY_SUMMARY_HEADER}\n");
    for (rank, entry) in entries.iter().take(WEEKLY_SUMMARY_LIMIT).enumerate() {
        text.push_str(&format!("\n{} : {} \n{}\n", rank + 1, entry.title, entry.url));
    }
    text
}
