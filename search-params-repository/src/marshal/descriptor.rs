//! Static field tables for parameter types.
//!
//! Each parameter type declares its query-string fields once: the field
//! name, an optional wire name, accessor functions and the shape of the
//! field (required scalar, optional scalar or list). The table drives both
//! directions of the marshalling.

use std::any::type_name;

use tracing::{debug, trace};

use crate::errors::MarshalError;
use crate::marshal::{ConverterRegistry, FlatMap};
use crate::parameters::{base_fields, Parameters};

/// Shape of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `T`, always present.
    Required,
    /// `Option<T>`.
    Optional,
    /// `Vec<T>`; empty means absent.
    List,
}

trait FieldBinding<P>: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn shape(&self) -> FieldShape;

    /// Assign from the non-blank values present for `key`.
    fn populate(
        &self,
        target: &mut P,
        key: &str,
        values: &[&str],
        registry: &ConverterRegistry,
    ) -> Result<(), MarshalError>;

    fn format(&self, source: &P, registry: &ConverterRegistry) -> Vec<String>;
}

struct RequiredBinding<P, T> {
    get: fn(&P) -> &T,
    set: fn(&mut P, T),
}

struct OptionalBinding<P, T> {
    get: fn(&P) -> &Option<T>,
    set: fn(&mut P, Option<T>),
}

struct ListBinding<P, T> {
    get: fn(&P) -> &Vec<T>,
    set: fn(&mut P, Vec<T>),
}

/// Parse the first value of a scalar field. `Ok(None)` when `T` has no parser.
fn parse_scalar<T: 'static>(
    key: &str,
    raw: &str,
    registry: &ConverterRegistry,
) -> Result<Option<T>, MarshalError> {
    match registry.parse::<T>(raw) {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(e)) => Err(MarshalError::type_conversion(key, raw, type_name::<T>(), e)),
        None => {
            trace!(key, type_name = type_name::<T>(), "No parser registered");
            Ok(None)
        }
    }
}

impl<P: 'static, T: 'static> FieldBinding<P> for RequiredBinding<P, T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn shape(&self) -> FieldShape {
        FieldShape::Required
    }

    fn populate(
        &self,
        target: &mut P,
        key: &str,
        values: &[&str],
        registry: &ConverterRegistry,
    ) -> Result<(), MarshalError> {
        if let Some(value) = parse_scalar::<T>(key, values[0], registry)? {
            (self.set)(target, value);
        }
        Ok(())
    }

    fn format(&self, source: &P, registry: &ConverterRegistry) -> Vec<String> {
        registry.format((self.get)(source)).into_iter().collect()
    }
}

impl<P: 'static, T: 'static> FieldBinding<P> for OptionalBinding<P, T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn shape(&self) -> FieldShape {
        FieldShape::Optional
    }

    fn populate(
        &self,
        target: &mut P,
        key: &str,
        values: &[&str],
        registry: &ConverterRegistry,
    ) -> Result<(), MarshalError> {
        if let Some(value) = parse_scalar::<T>(key, values[0], registry)? {
            (self.set)(target, Some(value));
        }
        Ok(())
    }

    fn format(&self, source: &P, registry: &ConverterRegistry) -> Vec<String> {
        (self.get)(source)
            .as_ref()
            .and_then(|value| registry.format(value))
            .into_iter()
            .collect()
    }
}

impl<P: 'static, T: 'static> FieldBinding<P> for ListBinding<P, T> {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn shape(&self) -> FieldShape {
        FieldShape::List
    }

    /// A single unparsable element leaves the whole list empty.
    fn populate(
        &self,
        target: &mut P,
        key: &str,
        values: &[&str],
        registry: &ConverterRegistry,
    ) -> Result<(), MarshalError> {
        let mut items = Vec::with_capacity(values.len());

        for raw in values {
            match registry.parse::<T>(raw) {
                Some(Ok(item)) => items.push(item),
                Some(Err(e)) => {
                    debug!(
                        key,
                        value = %raw,
                        error = %e,
                        "Dropping list parameter with an unparsable element"
                    );
                    (self.set)(target, Vec::new());
                    return Ok(());
                }
                None => {
                    trace!(key, type_name = type_name::<T>(), "No parser registered");
                    return Ok(());
                }
            }
        }

        (self.set)(target, items);
        Ok(())
    }

    fn format(&self, source: &P, registry: &ConverterRegistry) -> Vec<String> {
        (self.get)(source)
            .iter()
            .filter_map(|item| registry.format(item))
            .collect()
    }
}

/// One query-string field of a parameter type.
pub struct FieldDescriptor<P> {
    name: &'static str,
    wire_name: Option<&'static str>,
    binding: Box<dyn FieldBinding<P>>,
}

impl<P: 'static> FieldDescriptor<P> {
    /// A field that always holds a value.
    pub fn required<T: 'static>(
        name: &'static str,
        get: fn(&P) -> &T,
        set: fn(&mut P, T),
    ) -> Self {
        Self::with_binding(name, RequiredBinding { get, set })
    }

    /// A field that may be absent.
    pub fn optional<T: 'static>(
        name: &'static str,
        get: fn(&P) -> &Option<T>,
        set: fn(&mut P, Option<T>),
    ) -> Self {
        Self::with_binding(name, OptionalBinding { get, set })
    }

    /// A repeated field; one query-string entry per element.
    pub fn list<T: 'static>(
        name: &'static str,
        get: fn(&P) -> &Vec<T>,
        set: fn(&mut P, Vec<T>),
    ) -> Self {
        Self::with_binding(name, ListBinding { get, set })
    }

    fn with_binding(name: &'static str, binding: impl FieldBinding<P> + 'static) -> Self {
        Self {
            name,
            wire_name: None,
            binding: Box::new(binding),
        }
    }

    /// Use `wire_name` in query strings instead of the field name.
    pub fn with_wire_name(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// The declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The query-string key: the wire name if set, otherwise the field name.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    /// Name of the element type.
    pub fn type_name(&self) -> &'static str {
        self.binding.type_name()
    }

    pub fn shape(&self) -> FieldShape {
        self.binding.shape()
    }

    /// Whether `key` addresses this field (case-insensitive).
    pub fn matches(&self, key: &str) -> bool {
        self.wire_name().eq_ignore_ascii_case(key)
    }
}

impl<P> std::fmt::Debug for FieldDescriptor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("type_name", &self.binding.type_name())
            .field("shape", &self.binding.shape())
            .finish()
    }
}

/// The full field table of a parameter type, ordered by wire name.
#[derive(Debug)]
pub struct ParameterDescriptor<P> {
    fields: Vec<FieldDescriptor<P>>,
}

impl<P: Parameters> ParameterDescriptor<P> {
    /// Start a table that already holds the paging and sorting fields.
    pub fn builder() -> ParameterDescriptorBuilder<P> {
        ParameterDescriptorBuilder {
            fields: base_fields::<P>(),
        }
    }

    /// Fields in ascending wire-name order.
    pub fn fields(&self) -> &[FieldDescriptor<P>] {
        &self.fields
    }

    /// Find the field addressed by `key` (case-insensitive).
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor<P>> {
        self.fields.iter().find(|field| field.matches(key))
    }

    /// Assign every recognised key of `map` to `target`.
    ///
    /// Unknown keys and blank values are ignored. Scalar fields use the first
    /// value of a key.
    ///
    /// # Errors
    ///
    /// * `MarshalError::TypeConversion` - if a scalar value cannot be parsed as
    ///   the field's type
    pub fn populate(
        &self,
        map: &FlatMap,
        target: &mut P,
        registry: &ConverterRegistry,
    ) -> Result<(), MarshalError> {
        for (key, values) in map.iter() {
            let Some(field) = self.field(key) else {
                trace!(key, "Ignoring unknown parameter");
                continue;
            };

            let values: Vec<&str> = values
                .iter()
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
                .collect();

            if values.is_empty() {
                continue;
            }

            field.binding.populate(target, key, &values, registry)?;
        }

        Ok(())
    }

    /// Emit every present field that has a formatter.
    pub fn to_flat_map(&self, source: &P, registry: &ConverterRegistry) -> FlatMap {
        let mut map = FlatMap::new();

        for field in &self.fields {
            for value in field.binding.format(source, registry) {
                map.append(field.wire_name(), value);
            }
        }

        map
    }
}

/// Builder for [`ParameterDescriptor`].
///
/// Adding a field whose wire name matches an existing one (case-insensitive)
/// replaces it, so the paging fields can be redeclared.
pub struct ParameterDescriptorBuilder<P> {
    fields: Vec<FieldDescriptor<P>>,
}

impl<P: Parameters> ParameterDescriptorBuilder<P> {
    /// Add a field.
    pub fn field(mut self, field: FieldDescriptor<P>) -> Self {
        self.fields
            .retain(|existing| !existing.wire_name().eq_ignore_ascii_case(field.wire_name()));
        self.fields.push(field);
        self
    }

    /// Add a required field.
    pub fn required<T: 'static>(
        self,
        name: &'static str,
        get: fn(&P) -> &T,
        set: fn(&mut P, T),
    ) -> Self {
        self.field(FieldDescriptor::required(name, get, set))
    }

    /// Add an optional field.
    pub fn optional<T: 'static>(
        self,
        name: &'static str,
        get: fn(&P) -> &Option<T>,
        set: fn(&mut P, Option<T>),
    ) -> Self {
        self.field(FieldDescriptor::optional(name, get, set))
    }

    /// Add a list field.
    pub fn list<T: 'static>(
        self,
        name: &'static str,
        get: fn(&P) -> &Vec<T>,
        set: fn(&mut P, Vec<T>),
    ) -> Self {
        self.field(FieldDescriptor::list(name, get, set))
    }

    /// Sort the fields by wire name and freeze the table.
    pub fn build(mut self) -> ParameterDescriptor<P> {
        self.fields.sort_by(|a, b| a.wire_name().cmp(b.wire_name()));
        ParameterDescriptor {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::BaseParameters;
    use crate::test_support::ProductParameters;

    #[test]
    fn test_base_fields_are_present() {
        let descriptor = BaseParameters::descriptor();
        let names: Vec<&str> = descriptor.fields().iter().map(|f| f.wire_name()).collect();

        assert_eq!(names, ["page", "size", "sortBy", "sortDirection"]);
        assert_eq!(descriptor.field("page").unwrap().shape(), FieldShape::Optional);
        assert_eq!(descriptor.field("size").unwrap().shape(), FieldShape::Required);
    }

    #[test]
    fn test_fields_sorted_by_wire_name() {
        let descriptor = ProductParameters::descriptor();
        let names: Vec<&str> = descriptor.fields().iter().map(|f| f.wire_name()).collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"q"));
        assert!(!names.contains(&"query"));
    }

    #[test]
    fn test_field_lookup_is_case_insensitive() {
        let descriptor = ProductParameters::descriptor();

        assert_eq!(descriptor.field("SORTBY").unwrap().name(), "sort_by");
        assert_eq!(descriptor.field("Q").unwrap().name(), "query");
        assert!(descriptor.field("query").is_none());
        assert_eq!(descriptor.field("ratings").unwrap().type_name(), "i32");
    }

    #[test]
    fn test_builder_replaces_same_wire_name() {
        let descriptor = ParameterDescriptor::<BaseParameters>::builder()
            .optional(
                "page_number",
                |p: &BaseParameters| p.page_option(),
                |p: &mut BaseParameters, page| p.set_page(page),
            )
            .field(
                FieldDescriptor::optional(
                    "page_number",
                    |p: &BaseParameters| p.page_option(),
                    |p: &mut BaseParameters, page| p.set_page(page),
                )
                .with_wire_name("Page"),
            )
            .build();

        let pages: Vec<&FieldDescriptor<BaseParameters>> = descriptor
            .fields()
            .iter()
            .filter(|f| f.matches("page"))
            .collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name(), "page_number");
        assert!(descriptor.field("page_number").is_some());
    }
}
