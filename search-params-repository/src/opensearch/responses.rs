//! Mapping of raw `_search` responses into [`SearchResults`].

use std::collections::BTreeMap;

use search_params_shared::FilterField;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::SearchError;
use crate::marshal::FlatMap;
use crate::pagination::PaginationOptions;
use crate::parameters::Parameters;
use crate::types::{FacetBucket, FacetDefinition, SearchHit, SearchResults};

/// Map a raw search response into typed results for `parameters`.
///
/// # Returns
///
/// * `Ok(SearchResults)` - Hits, total, pagination and facet buckets
/// * `Err(SearchError::ParseError)` - If `hits` is missing or a `_source`
///   cannot be decoded as `D`
pub fn parse_search_response<P, D>(
    response: &Value,
    parameters: &P,
    facets: &[FacetDefinition],
) -> Result<SearchResults<P, D>, SearchError>
where
    P: Parameters,
    D: DeserializeOwned,
{
    let hits = response
        .get("hits")
        .ok_or_else(|| SearchError::parse("Response has no 'hits' section"))?;

    let total = parse_total(hits.get("total"))?;

    let documents = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .map(parse_hit)
        .collect::<Result<Vec<SearchHit<D>>, SearchError>>()?;

    let flat_map = parameters.to_flat_map();
    let facets = facets
        .iter()
        .map(|facet| {
            let buckets = parse_buckets(response, facet, &flat_map);
            (facet.name.clone(), buckets)
        })
        .collect::<BTreeMap<_, _>>();

    Ok(SearchResults {
        hits: documents,
        total,
        pagination: PaginationOptions::new(parameters, total),
        facets,
    })
}

/// Read `hits.total`, which is `{"value": n}` on 7.x and later and a bare
/// number on older clusters.
fn parse_total(total: Option<&Value>) -> Result<u64, SearchError> {
    match total {
        None => Ok(0),
        Some(Value::Object(object)) => object
            .get("value")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::parse("'hits.total.value' is not a number")),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| SearchError::parse("'hits.total' is not a number")),
    }
}

fn parse_hit<D: DeserializeOwned>(hit: &Value) -> Result<SearchHit<D>, SearchError> {
    let id = hit
        .get("_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let source = hit
        .get("_source")
        .cloned()
        .ok_or_else(|| SearchError::parse(format!("Hit '{}' has no '_source'", id)))?;

    let document = serde_json::from_value(source)
        .map_err(|e| SearchError::parse(format!("Failed to decode hit '{}': {}", id, e)))?;

    Ok(SearchHit {
        id,
        score: hit.get("_score").and_then(Value::as_f64),
        document,
    })
}

fn parse_buckets(response: &Value, facet: &FacetDefinition, parameters: &FlatMap) -> Vec<FacetBucket> {
    let Some(buckets) = response
        .get("aggregations")
        .and_then(|aggregations| aggregations.get(&facet.name))
        .and_then(|aggregation| aggregation.get("buckets"))
        .and_then(Value::as_array)
    else {
        debug!(facet = %facet.name, "No buckets returned for facet");
        return Vec::new();
    };

    let filtered = parameters.get_all_ignore_case(&facet.name);

    buckets
        .iter()
        .filter_map(|bucket| {
            let key = bucket_key(bucket.get("key")?)?;
            let count = bucket.get("doc_count").and_then(Value::as_u64).unwrap_or(0);

            let field = FilterField::try_parse(&key, &facet.delimiter).unwrap_or_else(|| {
                debug!(facet = %facet.name, key = %key, "Bucket key is not an encoded filter field");
                FilterField::create(&key)
            });

            let selected = filtered.iter().any(|value| {
                value.eq_ignore_ascii_case(field.value()) || value.eq_ignore_ascii_case(&key)
            });

            Some(FacetBucket {
                field,
                count,
                selected,
            })
        })
        .collect()
}

/// Terms buckets over numeric or boolean fields have non-string keys.
fn bucket_key(key: &Value) -> Option<String> {
    match key {
        Value::String(key) => Some(key.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Product, ProductParameters};
    use serde_json::json;

    fn response() -> Value {
        json!({
            "took": 3,
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "max_score": 2.0,
                "hits": [
                    { "_id": "p1", "_score": 2.0, "_source": { "name": "Red boots", "price": 89.5 } },
                    { "_id": "p2", "_score": 1.25, "_source": { "name": "Blue boots", "price": 75.0 } }
                ]
            },
            "aggregations": {
                "options": {
                    "buckets": [
                        { "key": "waterproof||Waterproof", "doc_count": 30 },
                        { "key": "Wide Fit", "doc_count": 12 }
                    ]
                }
            }
        })
    }

    fn facets() -> Vec<FacetDefinition> {
        vec![FacetDefinition::new("options", "options.key")]
    }

    #[test]
    fn test_parse_hits_and_total() {
        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response(), &ProductParameters::default(), &facets()).unwrap();

        assert_eq!(results.total, 42);
        assert_eq!(results.hits.len(), 2);
        assert_eq!(results.hits[0].id, "p1");
        assert_eq!(results.hits[0].score, Some(2.0));
        assert_eq!(results.hits[1].document.name, "Blue boots");
        assert_eq!(results.pagination.pages(), 5);
    }

    #[test]
    fn test_parse_buckets() {
        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response(), &ProductParameters::default(), &facets()).unwrap();

        let buckets = results.facet("options");
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].field.value(), "waterproof");
        assert_eq!(buckets[0].field.text(), "Waterproof");
        assert_eq!(buckets[0].count, 30);
        assert_eq!(buckets[1].field.value(), "wide-fit");
        assert_eq!(buckets[1].field.text(), "Wide Fit");
    }

    #[test]
    fn test_selected_buckets() {
        let parameters = ProductParameters {
            options: vec!["WATERPROOF".to_string()],
            ..Default::default()
        };

        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response(), &parameters, &facets()).unwrap();

        let buckets = results.facet("options");
        assert!(buckets[0].selected);
        assert!(!buckets[1].selected);
    }

    #[test]
    fn test_bare_number_total() {
        let response = json!({ "hits": { "total": 7, "hits": [] } });

        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response, &ProductParameters::default(), &[]).unwrap();

        assert_eq!(results.total, 7);
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_aggregation_yields_empty_facet() {
        let response = json!({ "hits": { "total": { "value": 0 }, "hits": [] } });

        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response, &ProductParameters::default(), &facets()).unwrap();

        assert!(results.facet("options").is_empty());
        assert!(results.facets.contains_key("options"));
    }

    #[test]
    fn test_numeric_bucket_keys() {
        let response = json!({
            "hits": { "total": { "value": 1 }, "hits": [] },
            "aggregations": { "ratings": { "buckets": [{ "key": 5, "doc_count": 1 }] } }
        });
        let facets = vec![FacetDefinition::new("ratings", "rating")];

        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response, &ProductParameters::default(), &facets).unwrap();

        assert_eq!(results.facet("ratings")[0].field.value(), "5");
    }

    #[test]
    fn test_facet_names_with_path_characters() {
        let response = json!({
            "hits": { "total": { "value": 1 }, "hits": [] },
            "aggregations": {
                "size/fit": { "buckets": [{ "key": "wide||Wide", "doc_count": 4 }] },
                "colour~tone": { "buckets": [{ "key": "dark||Dark", "doc_count": 2 }] }
            }
        });
        let facets = vec![
            FacetDefinition::new("size/fit", "fit.key"),
            FacetDefinition::new("colour~tone", "tone.key"),
        ];

        let results: SearchResults<ProductParameters, Product> =
            parse_search_response(&response, &ProductParameters::default(), &facets).unwrap();

        assert_eq!(results.facet("size/fit")[0].field.value(), "wide");
        assert_eq!(results.facet("colour~tone")[0].count, 2);
    }

    #[test]
    fn test_missing_hits_is_parse_error() {
        let result: Result<SearchResults<ProductParameters, Product>, _> =
            parse_search_response(&json!({ "took": 1 }), &ProductParameters::default(), &[]);

        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[test]
    fn test_undecodable_source_is_parse_error() {
        let response = json!({
            "hits": { "total": { "value": 1 }, "hits": [{ "_id": "x", "_source": { "name": 3 } }] }
        });

        let result: Result<SearchResults<ProductParameters, Product>, _> =
            parse_search_response(&response, &ProductParameters::default(), &[]);

        match result {
            Err(SearchError::ParseError(message)) => assert!(message.contains("'x'")),
            other => panic!("expected parse error, got {:?}", other.map(|r| r.total)),
        }
    }
}
