//! # Search Client Shared
//!
//! Data types shared by the search client and its callers: records as they
//! are submitted to an index, query parameters, and the responses returned
//! by the search service.

pub mod query;
pub mod record;
pub mod response;

pub use query::{index_name_of, RequestDescriptor, SearchQuery, INDEX_NAME_FIELD};
pub use record::{ensure_object_id, object_id, Record, OBJECT_ID_FIELD};
pub use response::{FacetCounts, SearchResponse, TaskResponse};
