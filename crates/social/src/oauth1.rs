//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter API
//! for user-context requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use sha1::Sha1;

/// Consumer and access-token pairs of one app/user.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuth1Credentials {
    #[serde(rename = "CK")]
    pub consumer_key: String,
    #[serde(rename = "CS")]
    pub consumer_secret: String,
    #[serde(rename = "AT")]
    pub access_token: String,
    #[serde(rename = "ATS")]
    pub access_token_secret: String,
}

/// RFC 3986 percent-encoding: everything but unreserved characters.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `METHOD&url&params` with params encoded, sorted and joined.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&joined)
    )
}

pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the `Authorization` header value for one request.
///
/// `params` are the query or form parameters that take part in the
/// signature. JSON and multipart bodies do not.
pub fn authorization_header(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &str,
    timestamp: i64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth_params = [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let all: Vec<(String, String)> = oauth_params
        .iter()
        .chain(params.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let base = signature_base_string(method, url, &all);
    let signature = sign(&base, &credentials.consumer_secret, &credentials.access_token_secret);

    let fields = oauth_params
        .iter()
        .map(|(k, v)| (*k, *v))
        .chain(std::iter::once(("oauth_signature", signature.as_str())))
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

/// [`authorization_header`] with a fresh nonce and the current time.
pub fn authorization_header_now(
    credentials: &OAuth1Credentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
) -> String {
    let nonce: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    authorization_header(credentials, method, url, params, &nonce, chrono::Utc::now().timestamp())
}
