use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A social network articles are cross-posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Bluesky,
    Misskey,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [Self::Twitter, Self::Bluesky, Self::Misskey];

    /// `dim_posts` column holding the id of the first post on this platform.
    pub fn column(self) -> &'static str {
        match self {
            Self::Twitter => "tweet_id_of_first_tweet",
            Self::Bluesky => "bluesky_post_uri_of_first_post",
            Self::Misskey => "misskey_note_id_of_first_note",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Bluesky => "bluesky",
            Self::Misskey => "misskey",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown social type '{name}'. Must be one of: twitter, bluesky, misskey"
                ))
            })
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn columns_are_distinct() {
        let columns: std::collections::HashSet<_> =
            SocialPlatform::ALL.iter().map(|p| p.column()).collect();
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn names_round_trip() {
        for p in SocialPlatform::ALL {
            assert_eq!(SocialPlatform::from_name(p.name()).unwrap(), p);
            assert_eq!(serde_json::to_value(p).unwrap(), p.name());
        }
        assert_matches!(SocialPlatform::from_name("mastodon"), Err(CoreError::Validation(_)));
    }
}
