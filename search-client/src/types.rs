//! Request types handed to the transport.

use serde_json::Value;
use url::form_urlencoded;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// The method as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Service endpoint addressed by a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// The index itself: record creation, deletion of the index.
    Index { index_name: String },
    /// Index settings.
    Settings { index_name: String },
    /// Search within the index.
    Query { index_name: String },
    /// Batch of write operations on the index.
    Batch { index_name: String },
    /// Removal of every record, keeping settings.
    Clear { index_name: String },
}

impl Endpoint {
    /// The index addressed by this endpoint.
    pub fn index_name(&self) -> &str {
        match self {
            Endpoint::Index { index_name }
            | Endpoint::Settings { index_name }
            | Endpoint::Query { index_name }
            | Endpoint::Batch { index_name }
            | Endpoint::Clear { index_name } => index_name,
        }
    }

    /// Path of the endpoint, with the index name percent-encoded.
    pub fn path(&self) -> String {
        let index = encode_path_segment(self.index_name());
        match self {
            Endpoint::Index { .. } => format!("/1/indexes/{}", index),
            Endpoint::Settings { .. } => format!("/1/indexes/{}/settings", index),
            Endpoint::Query { .. } => format!("/1/indexes/{}/query", index),
            Endpoint::Batch { .. } => format!("/1/indexes/{}/batch", index),
            Endpoint::Clear { .. } => format!("/1/indexes/{}/clear", index),
        }
    }
}

/// Form encoding writes spaces as `+`, which is wrong inside a path.
fn encode_path_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// A request for the transport to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            body: None,
        }
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path of the addressed endpoint.
    pub fn path(&self) -> String {
        self.endpoint.path()
    }
}
