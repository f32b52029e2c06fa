//! Single-record errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use search_client_shared::Record;

/// A failure caused by exactly one record.
///
/// The record is stored as the caller submitted it, including any `objectID`
/// the client generated before sending.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RecordError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    record: Record,
}

impl RecordError {
    /// Create an error for `record`.
    pub fn new(message: impl Into<String>, record: Record) -> Self {
        Self {
            message: message.into(),
            status: None,
            record,
        }
    }

    /// Attach a status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the record, consuming the error.
    pub fn with_record(mut self, record: Record) -> Self {
        self.record = record;
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

    /// The offending record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Replace the offending record. No validation is performed.
    pub fn set_record(&mut self, record: Record) -> &mut Self {
        self.record = record;
        self
    }

    /// Take the offending record out of the error.
    pub fn into_record(self) -> Record {
        self.record
    }
}
