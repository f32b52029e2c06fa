//! Disjunctive faceting.
//!
//! A disjunctive facet is ORed with itself and ANDed with the other facets. The
//! service only computes conjunctive counts, so a disjunctive search is run as
//! one main query plus one count-only query per disjunctive facet, in which
//! that facet's own refinements are left out. The per-facet counts are then
//! merged into the main response.

use serde_json::{Map, Value};

use crate::errors::SearchError;
use search_client_shared::{RequestDescriptor, SearchQuery, SearchResponse};

const DISJUNCTIVE_FACETS_MESSAGE: &str =
    "Argument \"disjunctive_facets\" must be a String or an Array";

const REFINEMENTS_MESSAGE: &str = "Argument \"refinements\" must be a Hash of Arrays";

/// Refined values per facet, in facet name order.
pub type Refinements = Vec<(String, Vec<String>)>;

/// Parse the `disjunctive_facets` argument.
///
/// Accepts a comma separated string or an array of strings.
pub fn parse_disjunctive_facets(value: &Value) -> Result<Vec<String>, SearchError> {
    match value {
        Value::String(facets) => Ok(facets
            .split(',')
            .map(str::trim)
            .filter(|facet| !facet.is_empty())
            .map(str::to_string)
            .collect()),
        Value::Array(facets) => facets
            .iter()
            .map(|facet| {
                facet
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SearchError::disjunctive_facets_invalid(DISJUNCTIVE_FACETS_MESSAGE))
            })
            .collect(),
        _ => Err(SearchError::disjunctive_facets_invalid(
            DISJUNCTIVE_FACETS_MESSAGE,
        )),
    }
}

/// Parse the `refinements` argument.
///
/// Accepts an object mapping facet names to arrays of values. An empty array
/// stands for "no refinements".
pub fn parse_refinements(value: &Value) -> Result<Refinements, SearchError> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        Value::Object(map) => map
            .iter()
            .map(|(facet, values)| {
                values
                    .as_array()
                    .and_then(|values| values.iter().map(refinement_value).collect::<Option<Vec<String>>>())
                    .map(|values| (facet.clone(), values))
                    .ok_or_else(|| SearchError::refinements_invalid(REFINEMENTS_MESSAGE))
            })
            .collect(),
        _ => Err(SearchError::refinements_invalid(REFINEMENTS_MESSAGE)),
    }
}

fn refinement_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build `facetFilters`, skipping the refinements of `excluded`.
///
/// Refinements of a disjunctive facet become one ORed group; the others are
/// ANDed individually.
fn facet_filters(refinements: &Refinements, disjunctive: &[String], excluded: Option<&str>) -> Value {
    let mut filters = Vec::new();
    for (facet, values) in refinements {
        if Some(facet.as_str()) == excluded {
            continue;
        }

        let refined = values
            .iter()
            .map(|value| Value::String(format!("{}:{}", facet, value)));
        if disjunctive.contains(facet) {
            filters.push(Value::Array(refined.collect()));
        } else {
            filters.extend(refined);
        }
    }
    Value::Array(filters)
}

/// Build the main query followed by one count query per disjunctive facet.
pub fn build_queries(
    index_name: &str,
    query: &str,
    params: &Map<String, Value>,
    disjunctive: &[String],
    refinements: &Refinements,
) -> Vec<RequestDescriptor> {
    let mut main = params.clone();
    main.insert(
        "facetFilters".to_string(),
        facet_filters(refinements, disjunctive, None),
    );

    let mut queries = vec![SearchQuery::with_params(query, main).to_descriptor(index_name)];

    for facet in disjunctive {
        let counts = SearchQuery::with_params(query, params.clone())
            .param("facetFilters", facet_filters(refinements, disjunctive, Some(facet.as_str())))
            .page(0)
            .hits_per_page(0)
            .param("attributesToRetrieve", Value::Array(Vec::new()))
            .param("attributesToHighlight", Value::Array(Vec::new()))
            .param("attributesToSnippet", Value::Array(Vec::new()))
            .param("facets", facet.as_str())
            .param("analytics", false);
        queries.push(counts.to_descriptor(index_name));
    }

    queries
}

/// Merge the responses of [`build_queries`] into the main response.
///
/// Counts of each count query land in `disjunctive_facets`. Refined values of a
/// disjunctive facet that received no count are reported with a count of 0.
pub fn merge_responses(
    responses: Vec<SearchResponse>,
    disjunctive: &[String],
    refinements: &Refinements,
) -> Result<SearchResponse, SearchError> {
    let mut responses = responses.into_iter();
    let mut merged = responses
        .next()
        .ok_or_else(|| SearchError::api("Disjunctive faceting returned no results"))?;
    merged.disjunctive_facets.clear();

    for response in responses {
        for (facet, counts) in response.facets {
            let refined = refinements
                .iter()
                .find(|(name, _)| *name == facet && disjunctive.contains(name))
                .map(|(_, values)| values.as_slice())
                .unwrap_or_default();

            let entry = merged.disjunctive_facets.entry(facet).or_default();
            entry.extend(counts);
            for value in refined {
                entry.entry(value.clone()).or_insert(0);
            }
        }
    }

    Ok(merged)
}
