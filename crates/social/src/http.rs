use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::SocialError;

/// Timeout applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> Result<reqwest::Client, SocialError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Return the response unchanged on 2xx, or an [`SocialError::Api`] carrying
/// the status and body text.
pub async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, SocialError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(SocialError::Api {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

pub async fn parse_response<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, SocialError> {
    let response = ensure_success(service, response).await?;
    Ok(response.json::<T>().await?)
}
