//! Plain service errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure with no payload beyond its message and optional status code.
///
/// This is also what a [`SearchTransport`](crate::SearchTransport) returns for a
/// failed call, before the client classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl ApiError {
    /// Create an error without a status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attach the HTTP status code the service answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code, if the failure came from a service response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether the service blamed the request (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self.status, Some(400..=499))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let error = ApiError::new("Invalid Application-ID or API key").with_status(403);

        assert_eq!(error.message(), "Invalid Application-ID or API key");
        assert_eq!(error.status(), Some(403));
        assert!(error.is_client_error());
        assert_eq!(error.to_string(), "Invalid Application-ID or API key");
    }

    #[test]
    fn test_api_error_without_status() {
        let error = ApiError::new("connection reset");

        assert_eq!(error.status(), None);
        assert!(!error.is_client_error());
    }
}
