//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchProvider;

/// OpenSearch provider.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use search_params_repository::{OpenSearchProvider, SearchRepository};
///
/// let provider = OpenSearchProvider::new("http://localhost:9200")?;
/// let repository = SearchRepository::new(Arc::new(provider));
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a provider connected to a single node at `url`.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

#[async_trait]
impl SearchProvider for OpenSearchProvider {
    #[instrument(skip(self, body))]
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let took = took_millis(&value);
        debug!(took, "Search completed");
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            warn!(status = %response.status_code(), "Cluster health request failed");
            return Ok(false);
        }

        let health = response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = health.get("status").and_then(Value::as_str).unwrap_or("red");
        debug!(status = %status, "Cluster health");
        Ok(status != "red")
    }
}

/// The `took` field of a search response, or 0 when absent.
fn took_millis(response: &Value) -> u64 {
    response.get("took").and_then(Value::as_u64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_took_millis() {
        assert_eq!(took_millis(&json!({ "took": 12, "hits": {} })), 12);
        assert_eq!(took_millis(&json!({ "hits": {} })), 0);
    }

    #[test]
    fn test_invalid_url_is_connection_error() {
        let result = OpenSearchProvider::new("not a url");
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[test]
    fn test_valid_url() {
        assert!(OpenSearchProvider::new("http://localhost:9200").is_ok());
    }
}
