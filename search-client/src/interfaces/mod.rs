//! Interface definitions for the search client.
//!
//! This module defines the abstract `SearchTransport` trait through which the
//! client reaches the search service, so the network layer can be swapped out
//! or replaced by an in-memory implementation in tests.

mod search_transport;

pub use search_transport::SearchTransport;
