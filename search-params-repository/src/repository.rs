//! Search repository.
//!
//! Application code uses this to run a [`SearchDefinition`] against the
//! configured provider and get typed, paginated results back.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::SearchParamsConfig;
use crate::errors::SearchError;
use crate::interfaces::{SearchDefinition, SearchProvider};
use crate::marshal::FlatMap;
use crate::opensearch::{build_search_body, parse_search_response};
use crate::pagination::PageLink;
use crate::parameters::Parameters;
use crate::types::SearchResults;

/// Runs searches built from request parameters.
pub struct SearchRepository {
    provider: Arc<dyn SearchProvider>,
    config: SearchParamsConfig,
}

impl SearchRepository {
    /// Create a new SearchRepository with default configuration.
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            config: SearchParamsConfig::default(),
        }
    }

    /// Create a new SearchRepository with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchProvider>, config: SearchParamsConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SearchParamsConfig {
        &self.config
    }

    /// Check if the page size exceeds the configured limit.
    fn validate_page_size(&self, size: i32) -> Result<(), SearchError> {
        if let Some(max) = self.config.max_page_size {
            if size > max {
                return Err(SearchError::page_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Search `definition`'s index with `parameters`.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResults)` - Hits, total, pagination and facets
    /// * `Err(SearchError::PageSizeExceeded)` - If the page size is over the limit
    /// * `Err(SearchError)` - If the request or response mapping fails
    #[instrument(skip_all, fields(index = %definition.index(), page = parameters.base().page(), size = parameters.base().size()))]
    pub async fn search<S: SearchDefinition>(
        &self,
        definition: &S,
        parameters: &S::Parameters,
    ) -> Result<SearchResults<S::Parameters, S::Document>, SearchError> {
        self.validate_page_size(parameters.base().size())?;

        let body = build_search_body(definition, parameters, &self.config);
        let facets = definition.facets(parameters);

        let response = self.provider.search(definition.index(), &body).await?;
        let results = parse_search_response(&response, parameters, &facets)?;

        debug!(total = results.total, hits = results.hits.len(), "Search mapped");
        Ok(results)
    }

    /// Parse `query` into the definition's parameters and search.
    ///
    /// A malformed query string fails with [`SearchError::InvalidParameters`].
    pub async fn search_query_string<S: SearchDefinition>(
        &self,
        definition: &S,
        query: &str,
    ) -> Result<SearchResults<S::Parameters, S::Document>, SearchError> {
        let parameters = S::Parameters::from_flat_map(&FlatMap::from_query_string(query))?;
        self.search(definition, &parameters).await
    }

    /// Paging links around the current page of `results`, using the
    /// configured range.
    pub fn paging_links<P: Parameters, D>(&self, results: &SearchResults<P, D>) -> Vec<PageLink> {
        results.pagination.paging_group(self.config.paging_range)
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchError> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarshalError;
    use crate::test_support::{ProductParameters, ProductSearch};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct MockSearchProvider {
        response: Value,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl MockSearchProvider {
        fn new(response: Value) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for MockSearchProvider {
        async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
            self.requests
                .lock()
                .unwrap()
                .push((index.to_string(), body.clone()));
            Ok(self.response.clone())
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    struct FailingSearchProvider;

    #[async_trait]
    impl SearchProvider for FailingSearchProvider {
        async fn search(&self, _index: &str, _body: &Value) -> Result<Value, SearchError> {
            Err(SearchError::query("Search failed with status 400 Bad Request"))
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Err(SearchError::connection("connection refused"))
        }
    }

    fn response() -> Value {
        json!({
            "hits": {
                "total": { "value": 55 },
                "hits": [{ "_id": "p1", "_score": 1.0, "_source": { "name": "Boots", "price": 10.0 } }]
            },
            "aggregations": {
                "options": { "buckets": [{ "key": "wide-fit||Wide Fit", "doc_count": 8 }] }
            }
        })
    }

    #[tokio::test]
    async fn test_search() {
        let provider = Arc::new(MockSearchProvider::new(response()));
        let repository = SearchRepository::new(provider.clone());

        let mut parameters = ProductParameters::default();
        parameters.base.set_page(2);

        let results = repository.search(&ProductSearch, &parameters).await.unwrap();

        assert_eq!(results.total, 55);
        assert_eq!(results.hits[0].document.name, "Boots");
        assert_eq!(results.pagination.current_page(), 2);
        assert_eq!(results.pagination.pages(), 6);
        assert_eq!(results.facet("options")[0].field.text(), "Wide Fit");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "products");
        assert_eq!(requests[0].1["from"], 10);
    }

    #[tokio::test]
    async fn test_search_query_string() {
        let provider = Arc::new(MockSearchProvider::new(response()));
        let repository = SearchRepository::new(provider.clone());

        let results = repository
            .search_query_string(&ProductSearch, "?q=boots&page=3&sortBy=price&sortDirection=desc")
            .await
            .unwrap();

        assert_eq!(results.pagination.current_page(), 3);
        assert_eq!(results.pagination.parameters().query.as_deref(), Some("boots"));

        let requests = provider.requests.lock().unwrap();
        let body = &requests[0].1;
        assert_eq!(body["from"], 20);
        assert_eq!(body["query"], json!({ "match": { "name": "boots" } }));
        assert_eq!(body["sort"], json!([{ "price": { "order": "desc" } }]));
    }

    #[tokio::test]
    async fn test_invalid_query_string() {
        let repository = SearchRepository::new(Arc::new(MockSearchProvider::new(response())));

        let result = repository.search_query_string(&ProductSearch, "page=first").await;

        match result {
            Err(SearchError::InvalidParameters(MarshalError::TypeConversion { key, .. })) => {
                assert_eq!(key, "page");
            }
            other => panic!("expected invalid parameters, got {:?}", other.map(|r| r.total)),
        }
    }

    #[tokio::test]
    async fn test_page_size_limit() {
        let provider = Arc::new(MockSearchProvider::new(response()));
        let repository = SearchRepository::with_config(
            provider.clone(),
            SearchParamsConfig::with_max_page_size(50),
        );

        let parameters = ProductParameters {
            base: crate::BaseParameters::new(1, 51),
            ..Default::default()
        };

        let result = repository.search(&ProductSearch, &parameters).await;

        assert!(matches!(
            result,
            Err(SearchError::PageSizeExceeded { provided: 51, max: 50 })
        ));
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlimited_page_size() {
        let repository = SearchRepository::with_config(
            Arc::new(MockSearchProvider::new(response())),
            SearchParamsConfig::unlimited(),
        );

        let parameters = ProductParameters {
            base: crate::BaseParameters::new(1, 5000),
            ..Default::default()
        };

        assert!(repository.search(&ProductSearch, &parameters).await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_error_is_propagated() {
        let repository = SearchRepository::new(Arc::new(FailingSearchProvider));

        let result = repository
            .search(&ProductSearch, &ProductParameters::default())
            .await;

        assert!(matches!(result, Err(SearchError::QueryError(_))));
        assert!(matches!(
            repository.health_check().await,
            Err(SearchError::ConnectionError(_))
        ));
    }

    #[tokio::test]
    async fn test_paging_links() {
        let repository = SearchRepository::with_config(
            Arc::new(MockSearchProvider::new(response())),
            SearchParamsConfig {
                paging_range: 1,
                ..SearchParamsConfig::default()
            },
        );

        let mut parameters = ProductParameters::default();
        parameters.base.set_page(3);
        let results = repository.search(&ProductSearch, &parameters).await.unwrap();

        let pages: Vec<i32> = repository
            .paging_links(&results)
            .iter()
            .map(|link| link.page)
            .collect();
        assert_eq!(pages, [2, 3, 4]);
        assert!(repository.health_check().await.unwrap());
    }
}
