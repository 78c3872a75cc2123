//! Per-index search definitions.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::parameters::Parameters;
use crate::types::FacetDefinition;

/// Describes how one parameter type is searched against one index.
///
/// Only [`SearchDefinition::index`] is required; the defaults match every
/// document, request no facets and sort on the public sort name as given.
pub trait SearchDefinition: Send + Sync {
    /// Request parameters for this search.
    type Parameters: Parameters;

    /// Document type stored in `_source`.
    type Document: DeserializeOwned + Send;

    /// Index or alias to search.
    fn index(&self) -> &str;

    /// The `query` clause for `parameters`.
    fn query(&self, _parameters: &Self::Parameters) -> Value {
        json!({ "match_all": {} })
    }

    /// Terms aggregations to request alongside the hits.
    fn facets(&self, _parameters: &Self::Parameters) -> Vec<FacetDefinition> {
        Vec::new()
    }

    /// Map a public sort name to an index field. `None` drops the sort.
    fn sort_field(&self, sort_by: &str) -> Option<String> {
        Some(sort_by.to_string())
    }
}
