//! # Search Client
//!
//! This crate provides a client for a hosted search API together with the
//! structured error taxonomy it reports failures with. Errors keep the
//! offending records and requests attached, and batch operations aggregate
//! every independent failure instead of stopping at the first one.
//!
//! The network layer is abstracted behind [`SearchTransport`].

pub mod client;
pub mod config;
pub mod errors;
pub mod faceting;
pub mod index;
pub mod interfaces;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::SearchClient;
pub use config::{ClientConfig, ConfigError};
pub use errors::{
    aggregate, ApiError, BatchError, ErrorKind, IndexNotFoundError, RecordError,
    RecordsTooBigError, RequestsBatchError, SearchError,
};
pub use index::Index;
pub use interfaces::SearchTransport;
pub use types::{ApiRequest, Endpoint, Method};
