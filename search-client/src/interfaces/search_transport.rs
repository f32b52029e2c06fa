//! Search transport trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ApiError;
use crate::types::ApiRequest;

/// Abstract interface for executing requests against the search service.
///
/// Implementations own the network concerns (hosts, credentials, timeouts,
/// retries). The client only builds requests and classifies failures.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so one transport can serve
/// concurrent sub-requests.
///
/// # Error Handling
///
/// A failed call returns an [`ApiError`] with the service message and, when a
/// response was received, its HTTP status. The client turns it into the
/// matching [`SearchError`](crate::SearchError) variant.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Execute a request.
    ///
    /// # Arguments
    ///
    /// * `request` - Method, endpoint and optional JSON body
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The decoded JSON response body
    /// * `Err(ApiError)` - If the service rejected the request or could not be reached
    async fn send(&self, request: &ApiRequest) -> Result<Value, ApiError>;
}
