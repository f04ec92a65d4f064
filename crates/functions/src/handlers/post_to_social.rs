//! Cross-post one announcement to one platform.

use pressline_core::post_text::{announcement_text, bluesky_text};
use pressline_core::SocialPlatform;
use pressline_events::{Announcement, Message, MessagePublisher, SocialPostRecorded};
use pressline_social::{download_image, SocialPost, SocialPoster};

use crate::error::FunctionResult;

/// Text and attachments for `platform`.
///
/// Bluesky does not unfurl links in post text, so it gets a short text and
/// a link card instead of the URL.
pub fn compose(platform: SocialPlatform, announcement: &Announcement) -> SocialPost {
    match platform {
        SocialPlatform::Bluesky => SocialPost::text(bluesky_text(&announcement.post_title))
            .with_link(&announcement.post_url, &announcement.post_title),
        SocialPlatform::Twitter | SocialPlatform::Misskey => SocialPost::text(announcement_text(
            &announcement.post_title,
            &announcement.post_url,
            announcement.message_type,
        )),
    }
}

/// Post `announcement` with its OG image and return the platform's post id.
///
/// For new posts the id is published as a [`SocialPostRecorded`] so it can
/// be written back to the article.
pub async fn run(
    poster: &dyn SocialPoster,
    http: &reqwest::Client,
    publisher: &dyn MessagePublisher,
    announcement: &Announcement,
) -> FunctionResult<String> {
    let platform = poster.platform();
    let image = download_image(http, &announcement.og_url).await?;
    let post = compose(platform, announcement).with_image(image);

    let social_post_id = poster.post(&post).await?;
    tracing::info!(
        platform = %platform,
        post_title = %announcement.post_title,
        social_post_id = %social_post_id,
        "Posted announcement"
    );

    match announcement.post_id {
        Some(post_id) if announcement.records_social_ids() => {
            let record = SocialPostRecorded {
                post_id,
                social_type: platform,
                social_post_id: social_post_id.clone(),
            };
            publisher.publish(&Message::from(record)).await?;
        }
        _ => tracing::info!(
            message_type = announcement.message_type.name(),
            "Social post id is not recorded for this message type"
        ),
    }

    Ok(social_post_id)
}

#[cfg(test)]
mod tests {
    use pressline_core::MessageType;

    use super::*;

    fn announcement(message_type: MessageType) -> Announcement {
        Announcement {
            post_title: "無神論者の火".into(),
            post_url: "https://healthy-person-emulator.org/archives/23576".into(),
            og_url: "https://cdn/23576.jpg".into(),
            message_type,
            post_id: Some(23576),
        }
    }

    #[test]
    fn twitter_and_misskey_share_the_announcement_text() {
        let post = compose(SocialPlatform::Misskey, &announcement(MessageType::Random));
        assert_eq!(
            post.text,
            "[ランダム] : 無神論者の火 健常者エミュレータ事例集\nhttps://healthy-person-emulator.org/archives/23576"
        );
        assert!(post.link.is_none());
        assert_eq!(compose(SocialPlatform::Twitter, &announcement(MessageType::Random)), post);
    }

    #[test]
    fn bluesky_gets_a_link_card() {
        let post = compose(SocialPlatform::Bluesky, &announcement(MessageType::New));
        assert_eq!(post.text, "【新規記事】 : 無神論者の火");
        let link = post.link.unwrap();
        assert_eq!(link.uri, "https://healthy-person-emulator.org/archives/23576");
        assert_eq!(link.title, "無神論者の火");
    }
}
