/// Errors from the outbound HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A 2xx answer that lacks what the client needs.
    #[error("Unexpected {service} response: {message}")]
    UnexpectedResponse { service: &'static str, message: String },

    #[error("Token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
