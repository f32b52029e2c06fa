//! Search client implementation.
//!
//! This module provides the entry point for talking to the search service:
//! index handles, multi-index queries and multi-index batches. It is also where
//! transport failures are classified and partial failures aggregated.

use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::errors::{aggregate, classify, ApiError, ErrorContext, RequestsBatchError, SearchError};
use crate::index::Index;
use crate::interfaces::SearchTransport;
use crate::types::{ApiRequest, Endpoint, Method};
use search_client_shared::{
    index_name_of, RequestDescriptor, SearchResponse, TaskResponse, INDEX_NAME_FIELD,
};

/// The main client for interacting with the search service.
///
/// Cloning is cheap: clones share the transport.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn SearchTransport>,
    config: ClientConfig,
}

impl SearchClient {
    /// Create a new SearchClient with default configuration.
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            config: ClientConfig::default(),
        }
    }

    /// Create a new SearchClient with custom configuration.
    pub fn with_config(transport: Arc<dyn SearchTransport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a handle on an index. No request is made.
    pub fn init_index(&self, name: impl Into<String>) -> Index {
        Index::new(self.clone(), name.into())
    }

    /// Delete an index.
    ///
    /// # Returns
    ///
    /// * `Ok(TaskResponse)` - The deletion task
    /// * `Err(SearchError::IndexNotFound)` - If the index does not exist; the
    ///   error carries `name`
    pub async fn delete_index(&self, name: &str) -> Result<TaskResponse, SearchError> {
        let request = ApiRequest::new(
            Method::Delete,
            Endpoint::Index {
                index_name: name.to_string(),
            },
        );
        let body = self.send(request, ErrorContext::Index(name)).await?;
        info!(index = %name, "Index deleted");
        parse(body)
    }

    /// Run several queries, possibly against different indexes.
    ///
    /// Each descriptor holds `indexName` plus the query parameters. Queries run
    /// concurrently and responses are returned in descriptor order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchResponse>)` - One response per descriptor
    /// * `Err(SearchError::RequestsBatch)` - If any query failed; the error lists
    ///   every failed descriptor in input order
    #[instrument(skip(self, requests), fields(count = requests.len()))]
    pub async fn multiple_queries(
        &self,
        requests: Vec<RequestDescriptor>,
    ) -> Result<Vec<SearchResponse>, SearchError> {
        let total = requests.len();
        let outcomes = join_all(requests.iter().map(|descriptor| self.run_query(descriptor))).await;

        let mut responses = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for (descriptor, outcome) in requests.into_iter().zip(outcomes) {
            match outcome {
                Ok(response) => responses.push(response),
                Err(e) => {
                    debug!(
                        index = ?index_name_of(&descriptor),
                        error = %e,
                        "Query failed"
                    );
                    failed.push(descriptor);
                }
            }
        }

        if failed.is_empty() {
            return Ok(responses);
        }

        warn!(failed = failed.len(), total = total, "Multiple queries had failures");
        Err(RequestsBatchError::new(format!("{} of {} queries failed", failed.len(), total))
            .with_requests(failed)
            .into())
    }

    async fn run_query(&self, descriptor: &RequestDescriptor) -> Result<SearchResponse, SearchError> {
        let index_name = index_name_of(descriptor)
            .ok_or_else(|| SearchError::api("Query is missing indexName"))?;

        let mut params = descriptor.clone();
        params.remove(INDEX_NAME_FIELD);

        let request = ApiRequest::new(
            Method::Post,
            Endpoint::Query {
                index_name: index_name.to_string(),
            },
        )
        .with_body(Value::Object(params));

        let body = self.send(request, ErrorContext::Index(index_name)).await?;
        parse(body)
    }

    /// Send write operations addressed to several indexes.
    ///
    /// Each operation holds `indexName`, `action` and `body`. Operations are
    /// grouped per index, keeping the order in which indexes first appear, and
    /// each group is sent as one batch request. Every group is attempted even
    /// when an earlier one fails.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TaskResponse>)` - One task per index
    /// * `Err(SearchError)` - The failure of the only failing group, or a
    ///   `SearchError::Batch` holding the failure of each failing group in order.
    ///   Operations without `indexName` are reported together as a
    ///   `SearchError::RequestsBatch`.
    #[instrument(skip(self, operations), fields(count = operations.len()))]
    pub async fn batch(
        &self,
        operations: Vec<Map<String, Value>>,
    ) -> Result<Vec<TaskResponse>, SearchError> {
        let mut groups: Vec<(String, Vec<Value>)> = Vec::new();
        let mut unaddressed = Vec::new();

        for mut operation in operations {
            let index_name = match index_name_of(&operation) {
                Some(name) => name.to_string(),
                None => {
                    unaddressed.push(operation);
                    continue;
                }
            };
            operation.remove(INDEX_NAME_FIELD);

            match groups.iter_mut().find(|(name, _)| *name == index_name) {
                Some((_, group)) => group.push(Value::Object(operation)),
                None => groups.push((index_name, vec![Value::Object(operation)])),
            }
        }

        let mut errors: Vec<SearchError> = Vec::new();
        if !unaddressed.is_empty() {
            errors.push(
                RequestsBatchError::new("Batch operations are missing indexName")
                    .with_status(400)
                    .with_requests(unaddressed)
                    .into(),
            );
        }

        let mut tasks = Vec::with_capacity(groups.len());
        for (index_name, group) in groups {
            let count = group.len();
            let request = ApiRequest::new(
                Method::Post,
                Endpoint::Batch {
                    index_name: index_name.clone(),
                },
            )
            .with_body(json!({ "requests": group }));

            match self
                .send(request, ErrorContext::Index(&index_name))
                .await
                .and_then(parse::<TaskResponse>)
            {
                Ok(task) => {
                    debug!(index = %index_name, count = count, task_id = task.task_id, "Batch sent");
                    tasks.push(task);
                }
                Err(e) => {
                    warn!(index = %index_name, count = count, error = %e, "Batch failed");
                    errors.push(e);
                }
            }
        }

        let message = format!("{} batch requests failed", errors.len());
        aggregate(message, errors).map(|()| tasks)
    }

    /// Send a request without classifying a failure.
    pub(crate) async fn send_raw(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path(), "Sending request");
        self.transport.send(request).await
    }

    /// Send a request and classify a failure in `context`.
    pub(crate) async fn send(
        &self,
        request: ApiRequest,
        context: ErrorContext<'_>,
    ) -> Result<Value, SearchError> {
        self.send_raw(&request)
            .await
            .map_err(|e| classify(e, context))
    }
}

/// Decode a response body.
pub(crate) fn parse<T: DeserializeOwned>(body: Value) -> Result<T, SearchError> {
    serde_json::from_value(body)
        .map_err(|e| SearchError::api(format!("Failed to parse response: {}", e)))
}
