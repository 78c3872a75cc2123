//! # Search Params Repository
//!
//! This crate turns query-string request parameters into search requests
//! and maps search responses back into typed, paginated, faceted results.
//! It includes the query-string marshaller, the pagination calculator,
//! request/response mapping, errors, and a concrete provider for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod marshal;
pub mod opensearch;
pub mod pagination;
pub mod parameters;
pub mod repository;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::SearchParamsConfig;
pub use errors::{MarshalError, SearchError};
pub use interfaces::{SearchDefinition, SearchProvider};
pub use marshal::{ConverterRegistry, FieldDescriptor, FlatMap, ParameterDescriptor};
pub use opensearch::OpenSearchProvider;
pub use pagination::{PageLink, PaginationOptions};
pub use parameters::{BaseParameters, Parameters, DEFAULT_PAGE_SIZE};
pub use repository::SearchRepository;
pub use types::{FacetBucket, FacetDefinition, SearchHit, SearchResults};
