//! Interface definitions for the search layer.
//!
//! [`SearchProvider`] abstracts the search backend so the client can be
//! tested with mock implementations. [`SearchDefinition`] describes how a
//! parameter type is searched against one index.

mod search_definition;
mod search_provider;

pub use search_definition::SearchDefinition;
pub use search_provider::SearchProvider;
