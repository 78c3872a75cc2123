//! Marshalling error types.
//!
//! This module defines the errors raised while populating a parameters
//! object from a flat query-string map.

use thiserror::Error;

/// Boxed error returned by registered parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while converting query-string values.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// A value was present but could not be parsed as the field's declared type.
    #[error("Cannot convert '{value}' for parameter '{key}' to {type_name}: {source}")]
    TypeConversion {
        key: String,
        value: String,
        type_name: &'static str,
        source: BoxError,
    },
}

impl MarshalError {
    /// Create a type conversion error, keeping the parse error as the source.
    pub fn type_conversion(
        key: impl Into<String>,
        value: impl Into<String>,
        type_name: &'static str,
        source: BoxError,
    ) -> Self {
        Self::TypeConversion {
            key: key.into(),
            value: value.into(),
            type_name,
            source,
        }
    }

    /// The query-string key that failed to convert.
    pub fn key(&self) -> &str {
        match self {
            Self::TypeConversion { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_type_conversion_keeps_source() {
        let source = "abc".parse::<i32>().unwrap_err();
        let err = MarshalError::type_conversion("page", "abc", "i32", Box::new(source));

        assert_eq!(err.key(), "page");
        assert!(err.to_string().contains("'page'"));
        assert!(err.to_string().contains("i32"));
        assert!(err.source().is_some());
    }
}
