//! In-memory transport for tests.
//!
//! Emulates the parts of the search service the client relies on: a per-record
//! size limit that rejects a whole batch, missing-index errors, substring
//! search with facet filters and facet counts, scripted outages and scripted
//! record rejections.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use crate::errors::ApiError;
use crate::interfaces::SearchTransport;
use crate::types::{ApiRequest, Endpoint, Method};
use search_client_shared::{object_id, Record};

/// Default per-record size limit, in serialized bytes.
const DEFAULT_MAX_RECORD_BYTES: usize = 1_000;

#[derive(Default)]
struct State {
    indexes: BTreeMap<String, Vec<Record>>,
    failing: HashSet<String>,
    failing_requests: HashSet<usize>,
    rejected_attributes: HashSet<String>,
    requests: Vec<ApiRequest>,
    next_task_id: u64,
    next_object_id: u64,
}

pub(crate) struct MemoryTransport {
    state: Mutex<State>,
    max_record_bytes: usize,
}

impl MemoryTransport {
    pub(crate) fn new() -> Self {
        Self::with_max_record_bytes(DEFAULT_MAX_RECORD_BYTES)
    }

    pub(crate) fn with_max_record_bytes(max_record_bytes: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            max_record_bytes,
        }
    }

    /// Create (or replace) an index with the given records.
    pub(crate) async fn create_index(&self, name: &str, records: Vec<Record>) {
        self.state
            .lock()
            .await
            .indexes
            .insert(name.to_string(), records);
    }

    /// Answer every request addressed to `name` with a 503.
    pub(crate) async fn fail_index(&self, name: &str) {
        self.state.lock().await.failing.insert(name.to_string());
    }

    /// Answer the request at `position` (0-based, in arrival order) with a 503.
    pub(crate) async fn fail_request(&self, position: usize) {
        self.state.lock().await.failing_requests.insert(position);
    }

    /// Reject with a 400 any record carrying `attribute`. Size is checked first.
    pub(crate) async fn reject_attribute(&self, attribute: &str) {
        self.state
            .lock()
            .await
            .rejected_attributes
            .insert(attribute.to_string());
    }

    pub(crate) async fn records(&self, name: &str) -> Vec<Record> {
        self.state
            .lock()
            .await
            .indexes
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) async fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().await.requests.clone()
    }

    fn check_size(&self, record: &Record, position: usize) -> Result<(), ApiError> {
        let size = serde_json::to_vec(record).unwrap().len();
        if size <= self.max_record_bytes {
            return Ok(());
        }

        Err(ApiError::new(format!(
            "Record at the position {} objectID={} is too big size={} bytes. \
             Contact us if you need an extended quota",
            position,
            object_id(record).unwrap_or("undefined"),
            size
        ))
        .with_status(400))
    }

    fn check_record(&self, state: &State, record: &Record, position: usize) -> Result<(), ApiError> {
        self.check_size(record, position)?;
        match record
            .keys()
            .find(|attribute| state.rejected_attributes.contains(*attribute))
        {
            Some(attribute) => Err(bad_request(&format!(
                "Attribute {} is not allowed",
                attribute
            ))),
            None => Ok(()),
        }
    }
}

impl State {
    fn task_id(&mut self) -> u64 {
        self.next_task_id += 1;
        self.next_task_id
    }

    fn store(&mut self, index_name: &str, record: Record) -> String {
        let id = match object_id(&record) {
            Some(id) => id.to_string(),
            None => {
                self.next_object_id += 1;
                format!("generated-{}", self.next_object_id)
            }
        };
        self.indexes
            .entry(index_name.to_string())
            .or_default()
            .push(record);
        id
    }
}

fn missing_index() -> ApiError {
    ApiError::new("Index does not exist").with_status(404)
}

fn bad_request(message: &str) -> ApiError {
    ApiError::new(message).with_status(400)
}

fn object_body(value: Option<&Value>) -> Result<Record, ApiError> {
    value
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| bad_request("body must be an object"))
}

/// String forms of a record attribute, for filtering and facet counting.
fn facet_values(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Array(items) => items.iter().flat_map(facet_values).collect(),
        _ => Vec::new(),
    }
}

fn matches_filter(record: &Record, filter: &str) -> bool {
    match filter.split_once(':') {
        Some((attribute, expected)) => record
            .get(attribute)
            .map(|value| facet_values(value).iter().any(|v| v == expected))
            .unwrap_or(false),
        None => false,
    }
}

/// `facetFilters` entries are ANDed; nested arrays are ORed.
fn matches_filters(record: &Record, filters: Option<&Value>) -> bool {
    let Some(Value::Array(filters)) = filters else {
        return true;
    };

    filters.iter().all(|filter| match filter {
        Value::String(f) => matches_filter(record, f),
        Value::Array(any) => any
            .iter()
            .filter_map(Value::as_str)
            .any(|f| matches_filter(record, f)),
        _ => true,
    })
}

fn matches_text(record: &Record, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    record
        .values()
        .flat_map(facet_values)
        .any(|v| v.to_lowercase().contains(&query))
}

fn requested_facets(params: &Map<String, Value>) -> Vec<String> {
    match params.get("facets") {
        Some(Value::String(s)) => s.split(',').map(|f| f.trim().to_string()).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn run_query(records: &[Record], params: &Map<String, Value>) -> Value {
    let query = params.get("query").and_then(Value::as_str).unwrap_or("");
    let page = params.get("page").and_then(Value::as_u64).unwrap_or(0) as usize;
    let hits_per_page = params
        .get("hitsPerPage")
        .and_then(Value::as_u64)
        .unwrap_or(20) as usize;

    let matching: Vec<&Record> = records
        .iter()
        .filter(|r| matches_text(r, query) && matches_filters(r, params.get("facetFilters")))
        .collect();

    let mut facets: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for facet in requested_facets(params) {
        let counts = facets.entry(facet.clone()).or_default();
        for record in &matching {
            if let Some(value) = record.get(&facet) {
                for v in facet_values(value) {
                    *counts.entry(v).or_insert(0) += 1;
                }
            }
        }
    }

    let hits: Vec<&Record> = matching
        .iter()
        .skip(page * hits_per_page)
        .take(hits_per_page)
        .copied()
        .collect();

    json!({
        "hits": hits,
        "nbHits": matching.len(),
        "page": page,
        "query": query,
        "facets": facets,
    })
}

#[async_trait]
impl SearchTransport for MemoryTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let mut state = self.state.lock().await;
        let arrival = state.requests.len();
        state.requests.push(request.clone());

        let index_name = request.endpoint.index_name().to_string();
        if state.failing.contains(&index_name) || state.failing_requests.contains(&arrival) {
            return Err(ApiError::new("Service Unavailable").with_status(503));
        }

        match (request.method, &request.endpoint) {
            (Method::Post, Endpoint::Index { .. }) => {
                let record = object_body(request.body.as_ref())?;
                self.check_record(&state, &record, 0)?;
                let id = state.store(&index_name, record);
                Ok(json!({"taskID": state.task_id(), "objectID": id}))
            }
            (Method::Delete, Endpoint::Index { .. }) => match state.indexes.remove(&index_name) {
                Some(_) => Ok(json!({"taskID": state.task_id()})),
                None => Err(missing_index()),
            },
            (Method::Post, Endpoint::Batch { .. }) => {
                let operations = request
                    .body
                    .as_ref()
                    .and_then(|body| body.get("requests"))
                    .and_then(Value::as_array)
                    .ok_or_else(|| bad_request("requests must be an array"))?;

                let mut records = Vec::with_capacity(operations.len());
                for (position, operation) in operations.iter().enumerate() {
                    if operation.get("action").and_then(Value::as_str) != Some("addObject") {
                        return Err(bad_request("unsupported batch action"));
                    }
                    let record = object_body(operation.get("body"))?;
                    self.check_record(&state, &record, position)?;
                    records.push(record);
                }

                let ids: Vec<String> = records
                    .into_iter()
                    .map(|record| state.store(&index_name, record))
                    .collect();
                Ok(json!({"taskID": state.task_id(), "objectIDs": ids}))
            }
            (Method::Post, Endpoint::Clear { .. }) => {
                state
                    .indexes
                    .get_mut(&index_name)
                    .ok_or_else(missing_index)?
                    .clear();
                Ok(json!({"taskID": state.task_id()}))
            }
            (Method::Get, Endpoint::Settings { .. }) => {
                if state.indexes.contains_key(&index_name) {
                    Ok(json!({"hitsPerPage": 20, "searchableAttributes": []}))
                } else {
                    Err(missing_index())
                }
            }
            (Method::Post, Endpoint::Query { .. }) => {
                let params = match &request.body {
                    Some(body) => object_body(Some(body))?,
                    None => Map::new(),
                };
                match state.indexes.get(&index_name) {
                    Some(records) => Ok(run_query(records, &params)),
                    None => Err(missing_index()),
                }
            }
            _ => Err(ApiError::new("Method not allowed").with_status(405)),
        }
    }
}
