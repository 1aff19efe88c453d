//! Client error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed and could not be recovered by a token refresh
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token store could not be read or written
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Coarse classification of a [`ClientError`]
///
/// Expired access tokens are consumed by the refresh protocol, so a 401 only
/// reaches callers once the session itself is no longer valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credentials were rejected and could not be refreshed; log in again
    AuthInvalid,
    /// The request was rejected as malformed (HTTP 400)
    BadRequest,
    /// Network failures, server errors and any other status
    Other,
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The HTTP status behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Serialization(_) | Self::Storage(_) | Self::Configuration(_) => None,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self.status() {
            Some(400) => ErrorKind::BadRequest,
            Some(401) => ErrorKind::AuthInvalid,
            _ => ErrorKind::Other,
        }
    }

    /// Whether the server rejected the request with exactly 400
    pub fn is_bad_request(&self) -> bool {
        self.kind() == ErrorKind::BadRequest
    }

    /// Whether the server rejected the credentials
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::AuthInvalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, "bad".into()),
            ClientError::BadRequest(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, "no".into()),
            ClientError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, "gone".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_GATEWAY, "down".into()),
            ClientError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_kind_classification() {
        let bad = ClientError::from_status(StatusCode::BAD_REQUEST, String::new());
        assert_eq!(bad.kind(), ErrorKind::BadRequest);
        assert_eq!(bad.status(), Some(400));
        assert!(bad.is_bad_request());

        let unauthorized = ClientError::from_status(StatusCode::UNAUTHORIZED, String::new());
        assert_eq!(unauthorized.kind(), ErrorKind::AuthInvalid);
        assert!(unauthorized.is_auth_failure());

        // 422 is a client error but not "bad request"
        let unprocessable =
            ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, String::new());
        assert_eq!(unprocessable.kind(), ErrorKind::Other);

        let storage = ClientError::Storage("disk full".into());
        assert_eq!(storage.status(), None);
        assert_eq!(storage.kind(), ErrorKind::Other);
    }
}
