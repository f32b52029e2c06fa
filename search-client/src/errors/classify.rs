//! Mapping of transport failures onto the error taxonomy.

use super::{ApiError, IndexNotFoundError, RecordError, SearchError};
use search_client_shared::Record;

/// What the failed call was about.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ErrorContext<'a> {
    /// The error does not report which index was targeted.
    Unnamed,
    /// The call addressed the named index.
    Index(&'a str),
    /// The call wrote a single record.
    Record(&'a Record),
}

/// Whether the service rejected a write because of record size.
pub(crate) fn is_size_rejection(error: &ApiError) -> bool {
    matches!(error.status(), Some(400) | Some(413))
        && error.message().to_ascii_lowercase().contains("too big")
}

fn is_missing_index(error: &ApiError) -> bool {
    error.status() == Some(404) && error.message().to_ascii_lowercase().contains("does not exist")
}

fn record_error(error: &ApiError, record: &Record) -> RecordError {
    let record_error = RecordError::new(error.message(), record.clone());
    match error.status() {
        Some(status) => record_error.with_status(status),
        None => record_error,
    }
}

/// Classify a failure reported by the transport.
pub(crate) fn classify(error: ApiError, context: ErrorContext<'_>) -> SearchError {
    if is_missing_index(&error) {
        let index_name = match context {
            ErrorContext::Index(name) => Some(name.to_string()),
            ErrorContext::Unnamed | ErrorContext::Record(_) => None,
        };
        return SearchError::IndexNotFound(
            IndexNotFoundError::new(error.message(), index_name).with_status(404),
        );
    }

    match context {
        ErrorContext::Record(record) if is_size_rejection(&error) => {
            SearchError::RecordTooBig(record_error(&error, record))
        }
        ErrorContext::Record(record) if error.is_client_error() => {
            SearchError::Record(record_error(&error, record))
        }
        _ => SearchError::Api(error),
    }
}
