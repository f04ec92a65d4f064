//! Canonical site URLs and post filters.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::DbId;

/// Default public origin of the article site.
pub const DEFAULT_SITE_BASE_URL: &str = "https://healthy-person-emulator.org";

/// Marker in titles of posts created by integration checks against the live site.
static TEST_POST_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"プログラムテスト").expect("static regex is valid"));

/// Canonical article URL: `{base}/archives/{post_id}`.
pub fn article_url(base: &str, post_id: DbId) -> String {
    format!("{}/archives/{post_id}", base.trim_end_matches('/'))
}

/// Whether the post is a test post that must not be announced.
pub fn is_test_post(title: &str) -> bool {
    TEST_POST_TITLE.is_match(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_url_joins_without_double_slash() {
        assert_eq!(
            article_url("https://example.org/", 23576),
            "https://example.org/archives/23576"
        );
        assert_eq!(
            article_url(DEFAULT_SITE_BASE_URL, 1),
            "https://healthy-person-emulator.org/archives/1"
        );
    }

    #[test]
    fn test_posts_are_detected_anywhere_in_title() {
        assert!(is_test_post("プログラムテスト"));
        assert!(is_test_post("【プログラムテスト】投稿"));
        assert!(!is_test_post("無神論者の火"));
    }
}
