//! Configuration types for the search client.

use std::env;

use thiserror::Error;

/// Default number of records sent per batch request.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// Environment variable overriding the batch size.
pub const BATCH_SIZE_ENV: &str = "SEARCH_BATCH_SIZE";

/// Environment variable enabling client-side `objectID` generation.
pub const AUTO_OBJECT_IDS_ENV: &str = "SEARCH_AUTO_OBJECT_IDS";

/// Errors raised while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

/// Configuration for the SearchClient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Maximum number of records sent in one batch request. Larger writes are
    /// split into chunks of this size.
    pub batch_size: usize,
    /// Generate an `objectID` for records that have none before sending them.
    pub auto_object_ids: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            auto_object_ids: false,
        }
    }
}

impl ClientConfig {
    /// Create a config with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    /// Enable or disable client-side `objectID` generation.
    pub fn auto_object_ids(mut self, enabled: bool) -> Self {
        self.auto_object_ids = enabled;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_BATCH_SIZE`: records per batch request (default: 1000)
    /// - `SEARCH_AUTO_OBJECT_IDS`: `true`/`false` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let batch_size = match lookup(BATCH_SIZE_ENV) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(invalid(BATCH_SIZE_ENV, value)),
            },
            None => DEFAULT_BATCH_SIZE,
        };

        let auto_object_ids = match lookup(AUTO_OBJECT_IDS_ENV) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid(AUTO_OBJECT_IDS_ENV, value)),
            },
            None => false,
        };

        Ok(Self {
            batch_size,
            auto_object_ids,
        })
    }
}

fn invalid(name: &str, value: String) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value,
    }
}
