//! # Search Params
//!
//! Entry point wiring for running query-string searches against an
//! OpenSearch index from the command line.

pub mod config;
pub mod search;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur while configuring or running a search.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A command line argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_params_repository::SearchError),

    /// The query string could not be read into parameters.
    #[error("Parameter error: {0}")]
    MarshalError(#[from] search_params_repository::MarshalError),

    /// Output serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
