//! Error taxonomy for the connection lifecycle.

use std::path::PathBuf;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

/// Every terminal state a connection can reach besides a normal response.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request line or a header line could not be parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Static file or directory does not exist (or escapes the document root).
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Accumulated request bytes went past the configured cap.
    #[error("request exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },

    /// Socket read or write failed; the peer never sees anything for this.
    #[error("connection fault: {0}")]
    ConnectionFault(#[from] std::io::Error),

    /// The pipeline returned an error before finishing its response.
    #[error("pipeline failed: {0}")]
    Pipeline(anyhow::Error),
}

impl ServerError {
    /// Status sent to the client for this error, if any is sent at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ServerError::MalformedRequest(_) => Some(StatusCode::BAD_REQUEST),
            ServerError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ServerError::RequestTooLarge { .. } => Some(StatusCode::PAYLOAD_TOO_LARGE),
            ServerError::ConnectionFault(_) | ServerError::Pipeline(_) => None,
        }
    }
}

impl From<ParseError> for ServerError {
    fn from(e: ParseError) -> Self {
        ServerError::MalformedRequest(e.to_string())
    }
}
