use thiserror::Error;

/// Error types that can occur when generating posts through Replicate.
#[derive(Debug, Error)]
pub enum BlogGenError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors reported by the model host
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// Generic error
    #[error("Generic error: {0}")]
    Generic(String),
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
}

/// Converts reqwest HTTP errors into BlogGenErrors
impl From<reqwest::Error> for BlogGenError {
    fn from(err: reqwest::Error) -> Self {
        BlogGenError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for BlogGenError {
    fn from(err: serde_json::Error) -> Self {
        BlogGenError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}
