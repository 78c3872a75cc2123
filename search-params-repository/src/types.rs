//! Request and response types for search operations.

use std::collections::BTreeMap;

use search_params_shared::{FilterField, DEFAULT_DELIMITER};
use serde::Serialize;

use crate::pagination::PaginationOptions;
use crate::parameters::Parameters;

/// A terms aggregation over a field holding encoded [`FilterField`] keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetDefinition {
    /// Aggregation name. Also the parameter key whose values select buckets.
    pub name: String,
    /// Index field the buckets are built from.
    pub field: String,
    /// Buckets to request. `None` uses the configured facet size.
    pub size: Option<usize>,
    /// Delimiter used to decode bucket keys.
    pub delimiter: String,
}

impl FacetDefinition {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            size: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
}

/// A single document returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<D> {
    pub id: String,
    pub score: Option<f64>,
    pub document: D,
}

/// One aggregation bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetBucket {
    pub field: FilterField,
    pub count: u64,
    /// Whether the request parameters already filter on this bucket.
    pub selected: bool,
}

/// Typed, paginated and faceted search results.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "D: Serialize, P: Parameters"))]
pub struct SearchResults<P, D> {
    pub hits: Vec<SearchHit<D>>,
    pub total: u64,
    pub pagination: PaginationOptions<P>,
    pub facets: BTreeMap<String, Vec<FacetBucket>>,
}

impl<P: Parameters, D> SearchResults<P, D> {
    /// Results with no hits and no facets for `parameters`.
    pub fn empty(parameters: &P) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            pagination: PaginationOptions::new(parameters, 0),
            facets: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Buckets of the facet `name`, empty if the facet was not requested.
    pub fn facet(&self, name: &str) -> &[FacetBucket] {
        self.facets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
