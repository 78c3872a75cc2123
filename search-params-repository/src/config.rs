//! Configuration types for the SearchRepository.

use std::env;
use std::str::FromStr;

use tracing::warn;

/// Default number of neighbouring pages on each side of the current page.
pub const DEFAULT_PAGING_RANGE: i32 = 5;

/// Default number of buckets requested per facet.
pub const DEFAULT_FACET_SIZE: usize = 10;

/// Configuration for the SearchRepository.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParamsConfig {
    /// Pages shown on each side of the current page in a paging group.
    pub paging_range: i32,
    /// Buckets requested for facets that do not set their own size.
    pub facet_size: usize,
    /// Largest page size a request may ask for.
    /// Set to None to disable the limit (not recommended for production).
    pub max_page_size: Option<i32>,
}

impl Default for SearchParamsConfig {
    fn default() -> Self {
        Self {
            paging_range: DEFAULT_PAGING_RANGE,
            facet_size: DEFAULT_FACET_SIZE,
            max_page_size: Some(1000),
        }
    }
}

impl SearchParamsConfig {
    /// Create a config with no page size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_page_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom page size limit.
    pub fn with_max_page_size(max_page_size: i32) -> Self {
        Self {
            max_page_size: Some(max_page_size),
            ..Self::default()
        }
    }

    /// Build a config from environment variables, falling back to defaults.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_PAGING_RANGE`: pages on each side of the current page (default: 5)
    /// - `SEARCH_FACET_SIZE`: buckets per facet (default: 10)
    /// - `SEARCH_MAX_PAGE_SIZE`: largest page size, `0` disables the limit (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_page_size = match env_or("SEARCH_MAX_PAGE_SIZE", defaults.max_page_size.unwrap_or(0)) {
            max if max <= 0 => None,
            max => Some(max),
        };

        Self {
            paging_range: env_or("SEARCH_PAGING_RANGE", defaults.paging_range).max(0),
            facet_size: env_or("SEARCH_FACET_SIZE", defaults.facet_size),
            max_page_size,
        }
    }
}

fn env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Ignoring unparsable environment variable");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchParamsConfig::default();

        assert_eq!(config.paging_range, 5);
        assert_eq!(config.facet_size, 10);
        assert_eq!(config.max_page_size, Some(1000));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(SearchParamsConfig::unlimited().max_page_size, None);
        assert_eq!(
            SearchParamsConfig::with_max_page_size(50).max_page_size,
            Some(50)
        );
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("SEARCH_PARAMS_TEST_UNSET_VARIABLE", 7), 7);
    }
}
