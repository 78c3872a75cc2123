//! Search error types.
//!
//! This module defines the error types that can occur during search operations.

use thiserror::Error;

use super::MarshalError;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse response from search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The request parameters could not be read from the query string.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] MarshalError),

    /// Requested page size exceeds the configured maximum.
    #[error("Page size {provided} exceeds maximum {max}")]
    PageSizeExceeded { provided: i32, max: i32 },
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a page size exceeded error.
    pub fn page_size_exceeded(provided: i32, max: i32) -> Self {
        Self::PageSizeExceeded { provided, max }
    }
}
