use crate::error::SocialError;
use crate::http::ensure_success;
use crate::poster::PostImage;

/// Fetch an image over HTTP. The filename is the last path segment of `url`.
pub async fn download_image(http: &reqwest::Client, url: &str) -> Result<PostImage, SocialError> {
    let response = ensure_success("Image host", http.get(url).send().await?).await?;
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(url).to_string());
    let bytes = response.bytes().await?.to_vec();

    Ok(PostImage {
        bytes,
        content_type,
        filename: filename_from_url(url),
    })
}

fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "image".to_string())
}

fn guess_content_type(url: &str) -> &'static str {
    let name = filename_from_url(url).to_ascii_lowercase();
    if name.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}
