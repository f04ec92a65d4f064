use pressline_cloud::CloudError;
use pressline_core::CoreError;
use pressline_events::EventError;
use pressline_render::RenderError;
use pressline_social::SocialError;

/// Error type shared by every handler.
///
/// Each collaborator crate's error converts in with `?`; binaries turn it
/// into a `lambda_runtime::Error` at the boundary so the invocation fails
/// and the trigger's own retry policy applies.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Social(#[from] SocialError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request payload failed validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type FunctionResult<T> = Result<T, FunctionError>;
