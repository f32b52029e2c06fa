//! Index handle.
//!
//! Writes, reads and searches scoped to one index. Batch writes are where
//! partial failures are collected: every chunk is attempted, and records the
//! service rejects for their size are gathered into a single
//! [`RecordsTooBigError`].

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::client::{parse, SearchClient};
use crate::errors::{
    aggregate, classify, is_size_rejection, ErrorContext, RecordsTooBigError, SearchError,
};
use crate::faceting;
use crate::types::{ApiRequest, Endpoint, Method};
use search_client_shared::{
    ensure_object_id, object_id, Record, SearchQuery, SearchResponse, TaskResponse,
};

/// Status reported on aggregated size rejections.
const SIZE_REJECTION_STATUS: u16 = 400;

/// A handle on one index, obtained from [`SearchClient::init_index`].
#[derive(Clone)]
pub struct Index {
    client: SearchClient,
    name: String,
}

impl Index {
    pub(crate) fn new(client: SearchClient, name: String) -> Self {
        Self { client, name }
    }

    /// Name of the index.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn endpoint_index(&self) -> Endpoint {
        Endpoint::Index {
            index_name: self.name.clone(),
        }
    }

    /// Add one record.
    ///
    /// When `auto_object_ids` is enabled, a record without `objectID` gets a
    /// generated one before it is sent.
    ///
    /// # Returns
    ///
    /// * `Ok(TaskResponse)` - The indexing task and the record's `objectID`
    /// * `Err(SearchError::RecordTooBig)` - If the record exceeds the size limit;
    ///   the error holds the record as sent
    /// * `Err(SearchError::Record)` - If the service rejected the record otherwise
    #[instrument(skip(self, record), fields(index = %self.name))]
    pub async fn add_object(&self, mut record: Record) -> Result<TaskResponse, SearchError> {
        if self.client.config().auto_object_ids {
            ensure_object_id(&mut record);
        }

        let request = ApiRequest::new(Method::Post, self.endpoint_index())
            .with_body(Value::Object(record.clone()));
        let body = self
            .client
            .send(request, ErrorContext::Record(&record))
            .await?;

        debug!(object_id = ?object_id(&record), "Record added");
        parse(body)
    }

    /// Add many records, split into chunks of the configured batch size.
    ///
    /// Every chunk is attempted. A chunk rejected because of record size is
    /// resubmitted record by record so that only the offending records fail.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TaskResponse>)` - The tasks of every accepted request
    /// * `Err(SearchError::RecordsTooBig)` - If the only failures are size
    ///   rejections; the error holds every rejected record in submission order
    /// * `Err(SearchError)` - The only other failure, or a `SearchError::Batch`
    ///   holding the size aggregate first and then every other failure in order
    #[instrument(skip(self, records), fields(index = %self.name, count = records.len()))]
    pub async fn add_objects(
        &self,
        mut records: Vec<Record>,
    ) -> Result<Vec<TaskResponse>, SearchError> {
        if self.client.config().auto_object_ids {
            for record in records.iter_mut() {
                ensure_object_id(record);
            }
        }

        let batch_size = self.client.config().batch_size.max(1);
        let mut tasks = Vec::new();
        let mut too_big: Option<RecordsTooBigError> = None;
        let mut failures = Vec::new();

        for (chunk_index, chunk) in records.chunks(batch_size).enumerate() {
            let request = ApiRequest::new(
                Method::Post,
                Endpoint::Batch {
                    index_name: self.name.clone(),
                },
            )
            .with_body(batch_body(chunk));

            match self.client.send_raw(&request).await {
                Ok(body) => match parse::<TaskResponse>(body) {
                    Ok(task) => tasks.push(task),
                    Err(e) => failures.push(e),
                },
                Err(e) if is_size_rejection(&e) => {
                    debug!(
                        chunk = chunk_index,
                        size = chunk.len(),
                        error = %e,
                        "Chunk rejected for size, sending records individually"
                    );
                    for record in chunk {
                        match self.add_object(record.clone()).await {
                            Ok(task) => tasks.push(task),
                            Err(SearchError::RecordTooBig(e)) => {
                                too_big
                                    .get_or_insert_with(|| {
                                        RecordsTooBigError::new("Records are too big")
                                            .with_status(SIZE_REJECTION_STATUS)
                                    })
                                    .add_record(e.into_record());
                            }
                            Err(e) => failures.push(e),
                        }
                    }
                }
                Err(e) => {
                    warn!(chunk = chunk_index, size = chunk.len(), error = %e, "Chunk rejected");
                    failures.push(classify(e, ErrorContext::Index(&self.name)));
                }
            }
        }

        if let Some(too_big) = too_big {
            warn!(count = too_big.len(), "Records rejected for size");
            failures.insert(0, SearchError::from(too_big));
        }

        if failures.is_empty() {
            info!(tasks = tasks.len(), "Records added");
        }

        let message = format!(
            "{} failures while adding {} records",
            failures.len(),
            records.len()
        );
        aggregate(message, failures).map(|()| tasks)
    }

    /// Get the index settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Map)` - The settings object
    /// * `Err(SearchError::IndexNotFound)` - If the index does not exist; the
    ///   settings endpoint does not report the index name, so none is attached
    pub async fn get_settings(&self) -> Result<Map<String, Value>, SearchError> {
        let request = ApiRequest::new(
            Method::Get,
            Endpoint::Settings {
                index_name: self.name.clone(),
            },
        );

        match self.client.send(request, ErrorContext::Unnamed).await? {
            Value::Object(settings) => Ok(settings),
            other => Err(SearchError::api(format!(
                "Unexpected settings response: {}",
                other
            ))),
        }
    }

    /// Search the index.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse)` - Hits and counts
    /// * `Err(SearchError::IndexNotFound)` - If the index does not exist; the
    ///   error carries this index's name
    #[instrument(skip(self, query), fields(index = %self.name, query = %query.query))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let request = ApiRequest::new(
            Method::Post,
            Endpoint::Query {
                index_name: self.name.clone(),
            },
        )
        .with_body(Value::Object(query.to_params()));

        let body = self
            .client
            .send(request, ErrorContext::Index(&self.name))
            .await?;
        parse(body)
    }

    /// Search with disjunctive (ORed) facets.
    ///
    /// # Arguments
    ///
    /// * `query` - The query text
    /// * `disjunctive_facets` - Comma separated string or array of facet names
    /// * `params` - Extra search parameters applied to every sub-query
    /// * `refinements` - Object mapping facet names to arrays of refined values
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse)` - The main response with `disjunctive_facets` filled
    /// * `Err(SearchError::DisjunctiveFacetsInvalid)` - If `disjunctive_facets`
    ///   has the wrong shape
    /// * `Err(SearchError::RefinementsInvalid)` - If `refinements` has the wrong
    ///   shape
    /// * `Err(SearchError::RequestsBatch)` - If some sub-queries failed
    pub async fn search_disjunctive_faceting(
        &self,
        query: &str,
        disjunctive_facets: &Value,
        params: Map<String, Value>,
        refinements: &Value,
    ) -> Result<SearchResponse, SearchError> {
        let disjunctive = faceting::parse_disjunctive_facets(disjunctive_facets)?;
        let refinements = faceting::parse_refinements(refinements)?;

        let queries =
            faceting::build_queries(&self.name, query, &params, &disjunctive, &refinements);
        let responses = self.client.multiple_queries(queries).await?;

        faceting::merge_responses(responses, &disjunctive, &refinements)
    }

    /// Remove every record, keeping the index and its settings.
    ///
    /// # Returns
    ///
    /// * `Ok(TaskResponse)` - The clearing task
    /// * `Err(SearchError::IndexNotFound)` - If the index does not exist
    pub async fn clear(&self) -> Result<TaskResponse, SearchError> {
        let request = ApiRequest::new(
            Method::Post,
            Endpoint::Clear {
                index_name: self.name.clone(),
            },
        );
        let body = self
            .client
            .send(request, ErrorContext::Index(&self.name))
            .await?;
        info!(index = %self.name, "Index cleared");
        parse(body)
    }

    /// Delete this index.
    pub async fn delete(&self) -> Result<TaskResponse, SearchError> {
        self.client.delete_index(&self.name).await
    }
}

fn batch_body(records: &[Record]) -> Value {
    let requests: Vec<Value> = records
        .iter()
        .map(|record| json!({"action": "addObject", "body": record}))
        .collect();
    json!({ "requests": requests })
}
