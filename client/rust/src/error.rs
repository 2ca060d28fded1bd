//! Error types for the DecorHub client library.

use reqwest::StatusCode;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failed to reach the backend.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The backend rejected the bearer token (401/403).
    #[error("unauthorized ({0}), signed out")]
    Unauthorized(StatusCode),

    /// Invalid argument provided by caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Returns the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Connection(msg) => msg.clone(),
            ClientError::Http(e) => e.to_string(),
            ClientError::Status { body, status } if body.is_empty() => status.to_string(),
            ClientError::Status { body, .. } => body.clone(),
            ClientError::Unauthorized(status) => status.to_string(),
            ClientError::InvalidArgument(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
        }
    }

    /// Returns the HTTP status if the backend answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Unauthorized(status) => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns true if the session was revoked by the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Returns true if this is a connection or timeout error.
    pub fn is_connection_error(&self) -> bool {
        match self {
            ClientError::Connection(_) => true,
            ClientError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
