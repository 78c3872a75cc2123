//! Parameter and document types shared by the unit tests.

use std::sync::OnceLock;

use search_params_shared::GeoPoint;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::interfaces::SearchDefinition;
use crate::marshal::{FieldDescriptor, ParameterDescriptor};
use crate::parameters::{BaseParameters, Parameters};
use crate::types::FacetDefinition;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductParameters {
    pub base: BaseParameters,
    pub query: Option<String>,
    pub options: Vec<String>,
    pub min_price: Option<f64>,
    pub ratings: Vec<i32>,
    pub location: Option<GeoPoint>,
    pub in_stock: Option<bool>,
    pub category: Option<i64>,
}

impl Parameters for ProductParameters {
    fn base(&self) -> &BaseParameters {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseParameters {
        &mut self.base
    }

    fn descriptor() -> &'static ParameterDescriptor<Self> {
        static DESCRIPTOR: OnceLock<ParameterDescriptor<ProductParameters>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            ParameterDescriptor::builder()
                .field(
                    FieldDescriptor::optional(
                        "query",
                        |p: &Self| &p.query,
                        |p: &mut Self, query| p.query = query,
                    )
                    .with_wire_name("q"),
                )
                .list("options", |p: &Self| &p.options, |p: &mut Self, v| p.options = v)
                .field(
                    FieldDescriptor::optional(
                        "min_price",
                        |p: &Self| &p.min_price,
                        |p: &mut Self, v| p.min_price = v,
                    )
                    .with_wire_name("minPrice"),
                )
                .list("ratings", |p: &Self| &p.ratings, |p: &mut Self, v| p.ratings = v)
                .optional("location", |p: &Self| &p.location, |p: &mut Self, v| p.location = v)
                .field(
                    FieldDescriptor::optional(
                        "in_stock",
                        |p: &Self| &p.in_stock,
                        |p: &mut Self, v| p.in_stock = v,
                    )
                    .with_wire_name("inStock"),
                )
                .optional("category", |p: &Self| &p.category, |p: &mut Self, v| p.category = v)
                .build()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
}

/// Searches the `products` index with an `options` facet.
pub struct ProductSearch;

impl SearchDefinition for ProductSearch {
    type Parameters = ProductParameters;
    type Document = Product;

    fn index(&self) -> &str {
        "products"
    }

    fn query(&self, parameters: &ProductParameters) -> Value {
        match &parameters.query {
            Some(text) => json!({ "match": { "name": text } }),
            None => json!({ "match_all": {} }),
        }
    }

    fn facets(&self, _parameters: &ProductParameters) -> Vec<FacetDefinition> {
        vec![FacetDefinition::new("options", "options.key").with_size(5)]
    }

    fn sort_field(&self, sort_by: &str) -> Option<String> {
        match sort_by {
            "name" => Some("name.raw".to_string()),
            "price" => Some("price".to_string()),
            _ => None,
        }
    }
}
