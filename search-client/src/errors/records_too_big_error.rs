//! Oversized records of a batch write.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use search_client_shared::Record;

/// One or more records of a batch write were rejected for their size.
///
/// Records are appended as they are discovered, so a single error can report
/// every offending record of a write split across several chunks. Until the
/// first record is added, [`records`](Self::records) returns `None`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RecordsTooBigError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    records: Option<Vec<Record>>,
}

impl RecordsTooBigError {
    /// Create an error with no records attached.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            records: None,
        }
    }

    /// Attach a status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the records, consuming the error.
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = Some(records);
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

    /// The offending records in discovery order, or `None` if none were added.
    pub fn records(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    /// Replace the offending records as a whole.
    pub fn set_records(&mut self, records: Vec<Record>) -> &mut Self {
        self.records = Some(records);
        self
    }

    /// Append one offending record.
    pub fn add_record(&mut self, record: Record) -> &mut Self {
        self.records.get_or_insert_with(Vec::new).push(record);
        self
    }

    /// Append every record of `other`, keeping their order.
    pub fn merge(&mut self, other: RecordsTooBigError) -> &mut Self {
        if let Some(records) = other.records {
            self.records.get_or_insert_with(Vec::new).extend(records);
        }
        self
    }

    /// Number of offending records.
    pub fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    /// Whether no record has been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the offending records out of the error.
    pub fn into_records(self) -> Vec<Record> {
        self.records.unwrap_or_default()
    }
}
