//! REST backend error types

use thiserror::Error;

/// REST backend error
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure or undecodable JSON
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected api key / token
    #[error("Authentication required")]
    Unauthorized,

    /// Any other non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response parsed but its content is unusable
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Bad base URL or key
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RemoteError {
    pub fn decode(msg: impl Into<String>) -> Self {
        RemoteError::Decode(msg.into())
    }
}

impl From<url::ParseError> for RemoteError {
    fn from(err: url::ParseError) -> Self {
        RemoteError::Config(err.to_string())
    }
}

/// Result type for REST backend operations
pub type RemoteResult<T> = Result<T, RemoteError>;
