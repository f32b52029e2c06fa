//! Missing index errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The targeted index does not exist.
///
/// The index name is only known for operations that address the index by name
/// in their request, such as queries and deletions.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct IndexNotFoundError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_name: Option<String>,
}

impl IndexNotFoundError {
    /// Create an error, optionally naming the index.
    pub fn new(message: impl Into<String>, index_name: Option<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            index_name,
        }
    }

    /// Attach a status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
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

    /// Name of the missing index, when known.
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }
}
