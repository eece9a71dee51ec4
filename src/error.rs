use thiserror::Error;

/// Failure categories surfaced to the view layer. Every variant renders as a
/// human-readable message next to a Retry action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Project with ID {0} not found")]
    NotFound(i64),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Rejected(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
