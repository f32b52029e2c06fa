//! Error types for the search client.
//!
//! Every failure surfaces as a [`SearchError`]. Variants that concern specific
//! inputs carry those inputs so a caller can log, fix or resubmit them.

mod api_error;
mod batch_error;
mod classify;
mod index_not_found_error;
mod record_error;
mod records_too_big_error;
mod requests_batch_error;
mod search_error;

pub use api_error::ApiError;
pub use batch_error::{aggregate, BatchError};
pub(crate) use classify::{classify, is_size_rejection, ErrorContext};
pub use index_not_found_error::IndexNotFoundError;
pub use record_error::RecordError;
pub use records_too_big_error::RecordsTooBigError;
pub use requests_batch_error::RequestsBatchError;
pub use search_error::{ErrorKind, SearchError};
