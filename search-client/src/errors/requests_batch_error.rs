//! Failed sub-requests of a multi-request call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use search_client_shared::RequestDescriptor;

/// Some sub-requests of one multi-index or multi-query call failed.
///
/// Holds the failed descriptors exactly as the caller supplied them, in the
/// order they appeared in the call.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RequestsBatchError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default)]
    requests: Vec<RequestDescriptor>,
}

impl RequestsBatchError {
    /// Create an error with no requests attached yet.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            requests: Vec::new(),
        }
    }

    /// Attach a status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the failed requests, consuming the error.
    pub fn with_requests(mut self, requests: Vec<RequestDescriptor>) -> Self {
        self.requests = requests;
        self
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The failed sub-requests.
    pub fn requests(&self) -> &[RequestDescriptor] {
        &self.requests
    }

    /// Replace the failed sub-requests as a whole.
    pub fn set_requests(&mut self, requests: Vec<RequestDescriptor>) -> &mut Self {
        self.requests = requests;
        self
    }
}
