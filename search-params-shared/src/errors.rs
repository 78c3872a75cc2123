//! Error types for the shared value types.

use thiserror::Error;

/// Errors that can occur while decoding a `FilterField` key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterFieldError {
    /// The key or the delimiter was empty or whitespace.
    #[error("Invalid argument: {0} must not be blank")]
    InvalidArgument(&'static str),

    /// The key did not split into exactly a value and a text segment.
    #[error("Key '{key}' split into {segments} segment(s), expected 2")]
    OutOfRange { key: String, segments: usize },
}

impl FilterFieldError {
    /// Create an invalid argument error for the named argument.
    pub fn invalid_argument(name: &'static str) -> Self {
        Self::InvalidArgument(name)
    }

    /// Create an out of range error for a key with the wrong segment count.
    pub fn out_of_range(key: impl Into<String>, segments: usize) -> Self {
        Self::OutOfRange {
            key: key.into(),
            segments,
        }
    }
}

/// Errors that can occur while parsing a value type from its string form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueParseError {
    /// The input is not a `lat,lon` pair.
    #[error("Invalid geo point: {0}")]
    InvalidGeoPoint(String),

    /// The input is not a known sort direction.
    #[error("Invalid sort direction: {0}")]
    InvalidSortDirection(String),
}

impl ValueParseError {
    /// Create an invalid geo point error.
    pub fn geo_point(msg: impl Into<String>) -> Self {
        Self::InvalidGeoPoint(msg.into())
    }

    /// Create an invalid sort direction error.
    pub fn sort_direction(msg: impl Into<String>) -> Self {
        Self::InvalidSortDirection(msg.into())
    }
}
