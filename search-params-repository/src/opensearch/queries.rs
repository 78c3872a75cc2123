//! OpenSearch request body builders.
//!
//! Turns a [`SearchDefinition`] and its parameters into a `_search` body.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::SearchParamsConfig;
use crate::interfaces::SearchDefinition;
use crate::parameters::Parameters;
use crate::types::FacetDefinition;

/// Build the `_search` body for `parameters`.
///
/// The body contains:
/// - `from`/`size` from the (self-healed) paging fields
/// - the definition's `query`
/// - a `sort` clause when `sortBy` maps to an index field
/// - one `terms` aggregation per facet
/// - `track_total_hits` so totals above 10k are exact
pub fn build_search_body<S: SearchDefinition>(
    definition: &S,
    parameters: &S::Parameters,
    config: &SearchParamsConfig,
) -> Value {
    let mut paging = parameters.base().clone();
    let from = paging.start();

    let mut body = Map::new();
    body.insert("from".to_string(), json!(from));
    body.insert("size".to_string(), json!(paging.size()));
    body.insert("query".to_string(), definition.query(parameters));

    if let Some(sort) = build_sort(definition, parameters) {
        body.insert("sort".to_string(), sort);
    }

    let facets = definition.facets(parameters);
    if !facets.is_empty() {
        body.insert("aggs".to_string(), build_aggregations(&facets, config));
    }

    body.insert("track_total_hits".to_string(), json!(true));

    Value::Object(body)
}

fn build_sort<S: SearchDefinition>(definition: &S, parameters: &S::Parameters) -> Option<Value> {
    let sort_by = parameters.base().sort_by()?;
    let Some(field) = definition.sort_field(sort_by) else {
        debug!(sort_by = %sort_by, "Dropping unknown sort field");
        return None;
    };

    let direction = parameters.base().sort_direction().unwrap_or_default();
    Some(json!([{ field: { "order": direction.as_order() } }]))
}

/// One `terms` aggregation per facet, keyed by facet name.
pub fn build_aggregations(facets: &[FacetDefinition], config: &SearchParamsConfig) -> Value {
    let aggs: Map<String, Value> = facets
        .iter()
        .map(|facet| {
            let terms = json!({
                "terms": {
                    "field": facet.field,
                    "size": facet.size.unwrap_or(config.facet_size),
                }
            });
            (facet.name.clone(), terms)
        })
        .collect();

    Value::Object(aggs)
}
