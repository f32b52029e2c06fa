//! The search client error taxonomy.
//!
//! [`SearchError`] is a closed set of variants sharing a message and an
//! optional status code. Variants that concern specific inputs carry them:
//!
//! - single-cause failures: [`Api`](SearchError::Api),
//!   [`IndexNotFound`](SearchError::IndexNotFound),
//!   [`DisjunctiveFacetsInvalid`](SearchError::DisjunctiveFacetsInvalid),
//!   [`RefinementsInvalid`](SearchError::RefinementsInvalid)
//! - one offending record: [`Record`](SearchError::Record),
//!   [`RecordTooBig`](SearchError::RecordTooBig)
//! - several offending inputs of one kind:
//!   [`RecordsTooBig`](SearchError::RecordsTooBig),
//!   [`RequestsBatch`](SearchError::RequestsBatch)
//! - several independent failures: [`Batch`](SearchError::Batch)
//!
//! Errors serialize to internally tagged JSON (`"type"`), so a logged error can
//! be read back with every payload intact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    ApiError, BatchError, IndexNotFoundError, RecordError, RecordsTooBigError,
    RequestsBatchError,
};
use search_client_shared::Record;

/// Message used when the service reports a missing index.
pub(crate) const INDEX_NOT_FOUND_MESSAGE: &str = "Index does not exist";

/// Errors that can occur during search client operations.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchError {
    /// Any failure without a more specific variant.
    #[error(transparent)]
    Api(ApiError),

    /// A single record was rejected.
    #[error(transparent)]
    Record(RecordError),

    /// A single record exceeds the size limit.
    #[error(transparent)]
    RecordTooBig(RecordError),

    /// Records of a batch write exceed the size limit.
    #[error(transparent)]
    RecordsTooBig(RecordsTooBigError),

    /// Sub-requests of a multi-request call failed.
    #[error(transparent)]
    RequestsBatch(RequestsBatchError),

    /// Several independent failures of one call.
    #[error(transparent)]
    Batch(BatchError),

    /// The targeted index does not exist.
    #[error(transparent)]
    IndexNotFound(IndexNotFoundError),

    /// The `disjunctive_facets` argument is neither a string nor a list.
    #[error(transparent)]
    DisjunctiveFacetsInvalid(ApiError),

    /// The `refinements` argument is not a map of lists.
    #[error(transparent)]
    RefinementsInvalid(ApiError),
}

/// Discriminant of a [`SearchError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Record,
    RecordTooBig,
    RecordsTooBig,
    RequestsBatch,
    Batch,
    IndexNotFound,
    DisjunctiveFacetsInvalid,
    RefinementsInvalid,
}

impl SearchError {
    /// Create a plain error.
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(ApiError::new(msg))
    }

    /// Create a rejected-record error.
    pub fn record(msg: impl Into<String>, record: Record) -> Self {
        Self::Record(RecordError::new(msg, record))
    }

    /// Create an oversized-record error.
    pub fn record_too_big(msg: impl Into<String>, record: Record) -> Self {
        Self::RecordTooBig(RecordError::new(msg, record))
    }

    /// Create a missing-index error.
    pub fn index_not_found(index_name: Option<String>) -> Self {
        Self::IndexNotFound(
            IndexNotFoundError::new(INDEX_NOT_FOUND_MESSAGE, index_name).with_status(404),
        )
    }

    /// Create an invalid disjunctive facets error.
    pub fn disjunctive_facets_invalid(msg: impl Into<String>) -> Self {
        Self::DisjunctiveFacetsInvalid(ApiError::new(msg))
    }

    /// Create an invalid refinements error.
    pub fn refinements_invalid(msg: impl Into<String>) -> Self {
        Self::RefinementsInvalid(ApiError::new(msg))
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(_) => ErrorKind::Api,
            Self::Record(_) => ErrorKind::Record,
            Self::RecordTooBig(_) => ErrorKind::RecordTooBig,
            Self::RecordsTooBig(_) => ErrorKind::RecordsTooBig,
            Self::RequestsBatch(_) => ErrorKind::RequestsBatch,
            Self::Batch(_) => ErrorKind::Batch,
            Self::IndexNotFound(_) => ErrorKind::IndexNotFound,
            Self::DisjunctiveFacetsInvalid(_) => ErrorKind::DisjunctiveFacetsInvalid,
            Self::RefinementsInvalid(_) => ErrorKind::RefinementsInvalid,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Api(e) | Self::DisjunctiveFacetsInvalid(e) | Self::RefinementsInvalid(e) => {
                e.message()
            }
            Self::Record(e) | Self::RecordTooBig(e) => e.message(),
            Self::RecordsTooBig(e) => e.message(),
            Self::RequestsBatch(e) => e.message(),
            Self::Batch(e) => e.message(),
            Self::IndexNotFound(e) => e.message(),
        }
    }

    /// Status code, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) | Self::DisjunctiveFacetsInvalid(e) | Self::RefinementsInvalid(e) => {
                e.status()
            }
            Self::Record(e) | Self::RecordTooBig(e) => e.status(),
            Self::RecordsTooBig(e) => e.status(),
            Self::RequestsBatch(e) => e.status(),
            Self::Batch(e) => e.status(),
            Self::IndexNotFound(e) => e.status(),
        }
    }

    /// Whether this error carries exactly one offending record.
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Record(_) | Self::RecordTooBig(_))
    }

    /// The offending record of a single-record error.
    pub fn offending_record(&self) -> Option<&Record> {
        match self {
            Self::Record(e) | Self::RecordTooBig(e) => Some(e.record()),
            _ => None,
        }
    }

    /// Every record carried by this error, descending into aggregates, in order.
    pub fn offending_records(&self) -> Vec<&Record> {
        match self {
            Self::Record(e) | Self::RecordTooBig(e) => vec![e.record()],
            Self::RecordsTooBig(e) => e.records().map(|r| r.iter().collect()).unwrap_or_default(),
            Self::Batch(e) => e.iter().flat_map(SearchError::offending_records).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<ApiError> for SearchError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<RecordsTooBigError> for SearchError {
    fn from(err: RecordsTooBigError) -> Self {
        Self::RecordsTooBig(err)
    }
}

impl From<RequestsBatchError> for SearchError {
    fn from(err: RequestsBatchError) -> Self {
        Self::RequestsBatch(err)
    }
}

impl From<BatchError> for SearchError {
    fn from(err: BatchError) -> Self {
        Self::Batch(err)
    }
}

impl From<IndexNotFoundError> for SearchError {
    fn from(err: IndexNotFoundError) -> Self {
        Self::IndexNotFound(err)
    }
}
