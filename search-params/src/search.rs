//! Parameters and search definition used by the command line.
//!
//! The index, facets and searched fields are only known at runtime, so the
//! definition is built from CLI arguments and hits are returned as raw JSON.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde_json::{json, Value};

use search_params_repository::{
    BaseParameters, ConverterRegistry, FacetDefinition, FieldDescriptor, ParameterDescriptor,
    Parameters, SearchDefinition,
};

use crate::AppError;

/// A `field:value` term filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub field: String,
    pub value: String,
}

impl TermFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for TermFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.value)
    }
}

impl FromStr for TermFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((field, value)) if !field.trim().is_empty() && !value.trim().is_empty() => {
                Ok(Self::new(field.trim(), value.trim()))
            }
            _ => Err(AppError::invalid_argument(format!(
                "Expected 'field:value' filter, got '{}'",
                s
            ))),
        }
    }
}

/// Request parameters accepted on the command line.
///
/// `q` is a free-text query and every `filter` adds a term filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliParameters {
    pub base: BaseParameters,
    pub query: Option<String>,
    pub filters: Vec<TermFilter>,
}

impl Parameters for CliParameters {
    fn base(&self) -> &BaseParameters {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseParameters {
        &mut self.base
    }

    fn descriptor() -> &'static ParameterDescriptor<Self> {
        static DESCRIPTOR: OnceLock<ParameterDescriptor<CliParameters>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            ParameterDescriptor::builder()
                .field(
                    FieldDescriptor::optional("query", |p: &Self| &p.query, |p: &mut Self, v| p.query = v)
                        .with_wire_name("q"),
                )
                .field(
                    FieldDescriptor::list("filters", |p: &Self| &p.filters, |p: &mut Self, v| p.filters = v)
                        .with_wire_name("filter"),
                )
                .build()
        })
    }
}

/// The built-in converters plus [`TermFilter`].
pub fn registry() -> ConverterRegistry {
    ConverterRegistry::builder()
        .register_from_str::<TermFilter>()
        .build()
}

/// A search over one index described by CLI arguments.
#[derive(Debug, Clone)]
pub struct CliSearch {
    pub index: String,
    pub facets: Vec<FacetDefinition>,
    pub search_fields: Vec<String>,
}

impl CliSearch {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            facets: Vec::new(),
            search_fields: Vec::new(),
        }
    }

    pub fn with_facets(mut self, facets: Vec<FacetDefinition>) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_search_fields(mut self, fields: Vec<String>) -> Self {
        self.search_fields = fields;
        self
    }
}

impl SearchDefinition for CliSearch {
    type Parameters = CliParameters;
    type Document = Value;

    fn index(&self) -> &str {
        &self.index
    }

    fn query(&self, parameters: &CliParameters) -> Value {
        let text = match &parameters.query {
            Some(text) if self.search_fields.is_empty() => json!({ "query_string": { "query": text } }),
            Some(text) => json!({ "multi_match": { "query": text, "fields": self.search_fields } }),
            None => json!({ "match_all": {} }),
        };

        if parameters.filters.is_empty() {
            return text;
        }

        let filters: Vec<Value> = parameters
            .filters
            .iter()
            .map(|filter| json!({ "term": { filter.field.as_str(): filter.value } }))
            .collect();

        json!({ "bool": { "must": [text], "filter": filters } })
    }

    fn facets(&self, _parameters: &CliParameters) -> Vec<FacetDefinition> {
        self.facets.clone()
    }
}

/// Parse a `name=field` facet declaration.
pub fn parse_facet(raw: &str) -> Result<FacetDefinition, String> {
    let (name, field) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected 'name=field', got '{}'", raw))?;

    let (name, field) = (name.trim(), field.trim());
    if name.is_empty() || field.is_empty() {
        return Err(format!("Expected 'name=field', got '{}'", raw));
    }

    Ok(FacetDefinition::new(name, field))
}
