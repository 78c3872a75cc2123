//! Dependency initialization and wiring for the search binary.

use std::env;
use std::sync::Arc;

use tracing::info;

use crate::AppError;
use search_params_repository::{OpenSearchProvider, SearchParamsConfig, SearchRepository};

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// The OpenSearch URL from `OPENSEARCH_URL`, or the default.
pub fn opensearch_url() -> String {
    env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string())
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The repository used to run searches.
    pub repository: SearchRepository,
}

impl Dependencies {
    /// Initialize all dependencies, verifying the cluster is reachable.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: used when `url` is `None` (default: http://localhost:9200)
    /// - `SEARCH_PAGING_RANGE`, `SEARCH_FACET_SIZE`, `SEARCH_MAX_PAGE_SIZE`:
    ///   see [`SearchParamsConfig::from_env`]
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the provider cannot be created or the cluster is unhealthy
    pub async fn new(url: Option<String>) -> Result<Self, AppError> {
        let opensearch_url = url.unwrap_or_else(opensearch_url);
        let config = SearchParamsConfig::from_env();

        info!(
            opensearch_url = %opensearch_url,
            paging_range = config.paging_range,
            facet_size = config.facet_size,
            max_page_size = ?config.max_page_size,
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&opensearch_url)
            .map_err(|e| AppError::config(format!("Failed to create OpenSearch provider: {}", e)))?;

        let repository = SearchRepository::with_config(Arc::new(provider), config);

        let healthy = repository
            .health_check()
            .await
            .map_err(|e| AppError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(AppError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        Ok(Self { repository })
    }
}
