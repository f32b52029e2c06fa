//! Aggregated failures of one batched call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SearchError;

/// Several independent failures from a single client call.
///
/// Children are kept in insertion order, so position `i` can be correlated with
/// the sub-operation that produced it. Nothing is deduplicated.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct BatchError {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default)]
    errors: Vec<SearchError>,
}

impl BatchError {
    /// Create an empty aggregate.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            errors: Vec::new(),
        }
    }

    /// Attach a status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the children, consuming the aggregate.
    pub fn with_errors(mut self, errors: Vec<SearchError>) -> Self {
        self.errors = errors;
        self
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status code, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The contained errors, in insertion order.
    pub fn errors(&self) -> &[SearchError] {
        &self.errors
    }

    /// Replace all contained errors.
    pub fn set_errors(&mut self, errors: Vec<SearchError>) -> &mut Self {
        self.errors = errors;
        self
    }

    /// Append one error.
    pub fn add_error(&mut self, error: SearchError) -> &mut Self {
        self.errors.push(error);
        self
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the direct children.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchError> {
        self.errors.iter()
    }

    /// All non-aggregate descendants, depth first.
    pub fn leaves(&self) -> Vec<&SearchError> {
        let mut leaves = Vec::new();
        for error in &self.errors {
            match error {
                SearchError::Batch(nested) => leaves.extend(nested.leaves()),
                other => leaves.push(other),
            }
        }
        leaves
    }
}

impl FromIterator<SearchError> for BatchError {
    fn from_iter<I: IntoIterator<Item = SearchError>>(iter: I) -> Self {
        let errors: Vec<SearchError> = iter.into_iter().collect();
        BatchError::new(format!("{} operations failed", errors.len())).with_errors(errors)
    }
}

impl Extend<SearchError> for BatchError {
    fn extend<I: IntoIterator<Item = SearchError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for BatchError {
    type Item = SearchError;
    type IntoIter = std::vec::IntoIter<SearchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchError {
    type Item = &'a SearchError;
    type IntoIter = std::slice::Iter<'a, SearchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Fold the failures of one call into a single result.
///
/// No failures is success, a single failure is returned unchanged, and several
/// failures are wrapped in a [`BatchError`] carrying `message`.
pub fn aggregate(message: impl Into<String>, mut errors: Vec<SearchError>) -> Result<(), SearchError> {
    if errors.len() > 1 {
        return Err(SearchError::Batch(BatchError::new(message).with_errors(errors)));
    }

    match errors.pop() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;

    fn api(message: &str) -> SearchError {
        SearchError::Api(ApiError::new(message))
    }

    #[test]
    fn test_add_error_keeps_call_order() {
        let mut batch = BatchError::new("batch failed");

        for i in 0..4 {
            batch.add_error(api(&format!("failure {}", i)));
        }

        let messages: Vec<&str> = batch.iter().map(SearchError::message).collect();
        assert_eq!(batch.len(), 4);
        assert_eq!(messages, vec!["failure 0", "failure 1", "failure 2", "failure 3"]);
    }

    #[test]
    fn test_set_errors_replaces_appended() {
        let mut batch = BatchError::new("batch failed");
        batch.add_error(api("a")).add_error(api("b"));

        batch.set_errors(vec![api("c")]);

        assert_eq!(batch.errors(), &[api("c")]);

        batch.set_errors(Vec::new());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let batch: BatchError = vec![api("same"), api("same")].into_iter().collect();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.message(), "2 operations failed");
    }

    #[test]
    fn test_extend_and_into_iter() {
        let mut batch = BatchError::new("batch failed");
        batch.extend(vec![api("a"), api("b")]);

        let collected: Vec<SearchError> = batch.into_iter().collect();
        assert_eq!(collected, vec![api("a"), api("b")]);
    }

    #[test]
    fn test_leaves_flattens_nested_batches() {
        let inner = BatchError::new("inner").with_errors(vec![api("b"), api("c")]);
        let outer = BatchError::new("outer").with_errors(vec![
            api("a"),
            SearchError::Batch(inner),
            api("d"),
        ]);

        let leaves: Vec<&str> = outer.leaves().into_iter().map(SearchError::message).collect();
        assert_eq!(leaves, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(aggregate("none", Vec::new()), Ok(()));
        assert_eq!(aggregate("one", vec![api("only")]), Err(api("only")));

        match aggregate("two failed", vec![api("a"), api("b")]) {
            Err(SearchError::Batch(batch)) => {
                assert_eq!(batch.message(), "two failed");
                assert_eq!(batch.errors(), &[api("a"), api("b")]);
            }
            other => panic!("expected a batch error, got {:?}", other),
        }
    }
}
