//! Search provider trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into
/// [`SearchRepository`](crate::SearchRepository) as `Arc<dyn SearchProvider>`,
/// which keeps the repository testable with mock providers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute a search request body against `index`.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw search response
    /// * `Err(SearchError)` - If the request fails or the engine rejects it
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
