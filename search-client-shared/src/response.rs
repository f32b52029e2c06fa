//! Responses returned by the search service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Facet value counts, keyed by facet name then by facet value.
pub type FacetCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// Result of a search against one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matching records for the requested page.
    #[serde(default)]
    pub hits: Vec<Record>,
    /// Total number of matching records.
    #[serde(default)]
    pub nb_hits: u64,
    /// Page that was returned.
    #[serde(default)]
    pub page: u64,
    /// The query text as understood by the service.
    #[serde(default)]
    pub query: String,
    /// Counts for the facets requested with the `facets` parameter.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: FacetCounts,
    /// Counts for disjunctive facets, filled by disjunctive faceting.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub disjunctive_facets: FacetCounts,
}

impl SearchResponse {
    /// A response with no hits.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Acknowledgement of a write operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Identifier of the asynchronous indexing task.
    #[serde(rename = "taskID")]
    pub task_id: u64,
    /// Identifier of the written record, for single-record writes.
    #[serde(rename = "objectID", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Identifiers of the written records, for batch writes.
    #[serde(rename = "objectIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub object_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_defaults() {
        let response: SearchResponse = serde_json::from_value(json!({"hits": []})).unwrap();

        assert_eq!(response, SearchResponse::empty());
    }

    #[test]
    fn test_search_response_facets() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": [{"objectID": "1"}],
            "nbHits": 1,
            "facets": {"brand": {"acme": 1}}
        }))
        .unwrap();

        assert_eq!(response.nb_hits, 1);
        assert_eq!(response.facets["brand"]["acme"], 1);
        assert!(response.disjunctive_facets.is_empty());
    }

    #[test]
    fn test_task_response_wire_names() {
        let task: TaskResponse = serde_json::from_value(json!({
            "taskID": 7,
            "objectIDs": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(task.task_id, 7);
        assert_eq!(task.object_id, None);
        assert_eq!(task.object_ids, vec!["a".to_string(), "b".to_string()]);
    }
}
