//! OpenSearch implementation of the search layer.
//!
//! Request bodies are plain JSON built by [`build_search_body`]; responses
//! are mapped by [`parse_search_response`].

mod provider;
mod queries;
mod responses;

pub use provider::OpenSearchProvider;
pub use queries::{build_aggregations, build_search_body};
pub use responses::parse_search_response;
