//! Parser and formatter registry.
//!
//! Maps an element type to the function that reads it from a query-string
//! value and the function that writes it back. Registries are assembled
//! with [`ConverterRegistryBuilder`] and are immutable once built. A single
//! process-wide registry is installed once at start-up and then shared by
//! every request.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use search_params_shared::{GeoPoint, SortDirection};

use crate::errors::BoxError;

type ParseFn<T> = Arc<dyn Fn(&str) -> Result<T, BoxError> + Send + Sync>;
type FormatFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

static GLOBAL_REGISTRY: OnceLock<ConverterRegistry> = OnceLock::new();

/// Immutable set of parsers and formatters keyed by element type.
#[derive(Clone)]
pub struct ConverterRegistry {
    parsers: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    formatters: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ConverterRegistry {
    /// Start a builder seeded with the built-in converters.
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::with_defaults()
    }

    /// Start a builder seeded with this registry's converters.
    pub fn to_builder(&self) -> ConverterRegistryBuilder {
        ConverterRegistryBuilder {
            registry: self.clone(),
        }
    }

    /// The process-wide registry.
    ///
    /// Returns the registry passed to [`ConverterRegistry::install`], or the
    /// built-in registry if nothing was installed before the first call.
    pub fn global() -> &'static ConverterRegistry {
        GLOBAL_REGISTRY.get_or_init(ConverterRegistry::default)
    }

    /// Install the process-wide registry.
    ///
    /// Succeeds only once, and only before the first call to
    /// [`ConverterRegistry::global`]. On failure the rejected registry is
    /// handed back.
    pub fn install(registry: ConverterRegistry) -> Result<(), ConverterRegistry> {
        GLOBAL_REGISTRY.set(registry)
    }

    /// Parse `raw` as a `T`, or `None` if no parser is registered for `T`.
    pub fn parse<T: 'static>(&self, raw: &str) -> Option<Result<T, BoxError>> {
        self.parsers
            .get(&TypeId::of::<T>())
            .and_then(|parser| parser.downcast_ref::<ParseFn<T>>())
            .map(|parse| parse(raw))
    }

    /// Format `value`, or `None` if no formatter is registered for `T`.
    pub fn format<T: 'static>(&self, value: &T) -> Option<String> {
        self.formatters
            .get(&TypeId::of::<T>())
            .and_then(|formatter| formatter.downcast_ref::<FormatFn<T>>())
            .map(|format| format(value))
    }

    /// Whether a parser is registered for `T`.
    pub fn has_parser<T: 'static>(&self) -> bool {
        self.parsers.contains_key(&TypeId::of::<T>())
    }

    /// Whether a formatter is registered for `T`.
    pub fn has_formatter<T: 'static>(&self) -> bool {
        self.formatters.contains_key(&TypeId::of::<T>())
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("parsers", &self.parsers.len())
            .field("formatters", &self.formatters.len())
            .finish()
    }
}

/// Builder for [`ConverterRegistry`].
///
/// Registering a converter for a type that already has one replaces it.
pub struct ConverterRegistryBuilder {
    registry: ConverterRegistry,
}

impl ConverterRegistryBuilder {
    /// A builder with no converters at all.
    pub fn empty() -> Self {
        Self {
            registry: ConverterRegistry {
                parsers: HashMap::new(),
                formatters: HashMap::new(),
            },
        }
    }

    /// A builder holding the built-in converters: `String`, `i32`, `i64`,
    /// `f64`, `bool`, `SortDirection` and `GeoPoint`.
    pub fn with_defaults() -> Self {
        Self::empty()
            .register_parser(|raw: &str| Ok(raw.to_string()))
            .register_formatter(|value: &String| value.clone())
            .register_from_str::<i32>()
            .register_from_str::<i64>()
            .register_from_str::<f64>()
            .register_parser(parse_bool)
            .register_formatter(|value: &bool| value.to_string())
            .register_from_str::<SortDirection>()
            .register_from_str::<GeoPoint>()
    }

    /// Register the parser for `T`.
    pub fn register_parser<T, F>(mut self, parse: F) -> Self
    where
        T: 'static,
        F: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let parse: ParseFn<T> = Arc::new(parse);
        self.registry
            .parsers
            .insert(TypeId::of::<T>(), Arc::new(parse));
        self
    }

    /// Register the formatter for `T`.
    pub fn register_formatter<T, F>(mut self, format: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let format: FormatFn<T> = Arc::new(format);
        self.registry
            .formatters
            .insert(TypeId::of::<T>(), Arc::new(format));
        self
    }

    /// Register `T`'s `FromStr` (on trimmed input) and `Display` implementations.
    pub fn register_from_str<T>(self) -> Self
    where
        T: FromStr + Display + 'static,
        T::Err: Error + Send + Sync + 'static,
    {
        self.register_parser(|raw: &str| raw.trim().parse::<T>().map_err(BoxError::from))
            .register_formatter(|value: &T| value.to_string())
    }

    /// Freeze the registry.
    pub fn build(self) -> ConverterRegistry {
        self.registry
    }
}

fn parse_bool(raw: &str) -> Result<bool, BoxError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("'{}' is not a boolean", raw).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parsers() {
        let registry = ConverterRegistry::default();

        assert_eq!(registry.parse::<i32>(" 42 ").unwrap().unwrap(), 42);
        assert_eq!(registry.parse::<i64>("-7").unwrap().unwrap(), -7);
        assert_eq!(registry.parse::<f64>("2.5").unwrap().unwrap(), 2.5);
        assert!(registry.parse::<bool>("TRUE").unwrap().unwrap());
        assert_eq!(
            registry.parse::<String>(" keep spaces ").unwrap().unwrap(),
            " keep spaces "
        );
        assert_eq!(
            registry.parse::<SortDirection>("descending").unwrap().unwrap(),
            SortDirection::Descending
        );
        assert_eq!(
            registry.parse::<GeoPoint>("1.5,2.5").unwrap().unwrap(),
            GeoPoint::new(1.5, 2.5)
        );
    }

    #[test]
    fn test_numeric_parse_is_strict() {
        let registry = ConverterRegistry::default();

        assert!(registry.parse::<i32>("12abc").unwrap().is_err());
        assert!(registry.parse::<i32>("1,5").unwrap().is_err());
        assert!(registry.parse::<f64>("1,5").unwrap().is_err());
        assert!(registry.parse::<bool>("yes").unwrap().is_err());
    }

    #[test]
    fn test_builtin_formatters() {
        let registry = ConverterRegistry::default();

        assert_eq!(registry.format(&100_i32).unwrap(), "100");
        assert_eq!(registry.format(&0.25_f64).unwrap(), "0.25");
        assert_eq!(registry.format(&SortDirection::Ascending).unwrap(), "Ascending");
        assert_eq!(registry.format(&GeoPoint::new(1.0, -2.5)).unwrap(), "1,-2.5");
    }

    #[test]
    fn test_unregistered_type() {
        #[derive(Debug)]
        struct Unknown;

        let registry = ConverterRegistry::default();

        assert!(!registry.has_parser::<Unknown>());
        assert!(registry.parse::<Unknown>("x").is_none());
        assert!(registry.format(&Unknown).is_none());
        assert!(registry.parse::<u8>("1").is_none());
    }

    #[test]
    fn test_register_custom_type() {
        #[derive(Debug, PartialEq)]
        struct Sku(String);

        let registry = ConverterRegistry::builder()
            .register_parser(|raw: &str| Ok(Sku(raw.to_uppercase())))
            .register_formatter(|sku: &Sku| sku.0.to_lowercase())
            .build();

        assert_eq!(registry.parse::<Sku>("ab-1").unwrap().unwrap(), Sku("AB-1".to_string()));
        assert_eq!(registry.format(&Sku("AB-1".to_string())).unwrap(), "ab-1");
        assert!(registry.has_parser::<i32>());
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = ConverterRegistry::builder()
            .register_formatter(|value: &i32| format!("#{}", value))
            .build();

        assert_eq!(registry.format(&5_i32).unwrap(), "#5");

        let rebuilt = registry
            .to_builder()
            .register_formatter(|value: &i32| value.to_string())
            .build();
        assert_eq!(rebuilt.format(&5_i32).unwrap(), "5");
        assert_eq!(registry.format(&5_i32).unwrap(), "#5");
    }

    #[test]
    fn test_empty_builder() {
        let registry = ConverterRegistryBuilder::empty().build();

        assert!(!registry.has_parser::<String>());
        assert!(!registry.has_formatter::<i32>());
    }

    #[test]
    fn test_global_registry_has_defaults() {
        assert!(ConverterRegistry::global().has_parser::<i32>());
        assert!(ConverterRegistry::global().has_formatter::<SortDirection>());
    }
}
