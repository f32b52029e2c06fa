//! Search query parameters and sub-request descriptors.

use serde_json::{Map, Value};

/// Field naming the target index inside a sub-request descriptor.
pub const INDEX_NAME_FIELD: &str = "indexName";

/// A sub-request of a multi-index call, exactly as the caller supplied it.
///
/// Conventionally holds `indexName` plus the query parameters.
pub type RequestDescriptor = Map<String, Value>;

/// Get the target index of a sub-request descriptor.
pub fn index_name_of(descriptor: &RequestDescriptor) -> Option<&str> {
    descriptor.get(INDEX_NAME_FIELD).and_then(Value::as_str)
}

/// Query text plus free-form search parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// The full-text query.
    pub query: String,
    /// Additional parameters (`page`, `hitsPerPage`, `facets`, `facetFilters`, ...).
    pub params: Map<String, Value>,
}

impl SearchQuery {
    /// Create a query with no extra parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Map::new(),
        }
    }

    /// Create a query from existing parameters. A `query` entry in `params` is
    /// overridden by `query`.
    pub fn with_params(query: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Set an arbitrary parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the page to fetch.
    pub fn page(self, page: u64) -> Self {
        self.param("page", page)
    }

    /// Set the number of hits per page.
    pub fn hits_per_page(self, hits_per_page: u64) -> Self {
        self.param("hitsPerPage", hits_per_page)
    }

    /// Flatten into the parameter object sent to the service.
    pub fn to_params(&self) -> Map<String, Value> {
        let mut params = self.params.clone();
        params.insert("query".to_string(), Value::String(self.query.clone()));
        params
    }

    /// Build the descriptor addressing this query to `index_name`.
    pub fn to_descriptor(&self, index_name: &str) -> RequestDescriptor {
        let mut descriptor = self.to_params();
        descriptor.insert(
            INDEX_NAME_FIELD.to_string(),
            Value::String(index_name.to_string()),
        );
        descriptor
    }
}
