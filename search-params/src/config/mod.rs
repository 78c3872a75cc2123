//! Configuration and dependency wiring for the search binary.

mod dependencies;

pub use dependencies::{opensearch_url, Dependencies, DEFAULT_OPENSEARCH_URL};
