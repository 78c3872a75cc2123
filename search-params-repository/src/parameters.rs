//! Request parameters.
//!
//! Every parameter type carries a [`BaseParameters`] with the paging and
//! sorting fields and declares its own fields through a static
//! [`ParameterDescriptor`].

use std::sync::OnceLock;

use search_params_shared::SortDirection;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::MarshalError;
use crate::marshal::{ConverterRegistry, FieldDescriptor, FlatMap, ParameterDescriptor};

/// Page size used when none, or a non-positive one, is given.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Paging and sorting fields shared by all parameter types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseParameters {
    page: Option<i32>,
    #[serde(default = "default_size", deserialize_with = "deserialize_size")]
    size: i32,
    sort_by: Option<String>,
    sort_direction: Option<SortDirection>,
}

impl Default for BaseParameters {
    fn default() -> Self {
        Self {
            page: None,
            size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_direction: None,
        }
    }
}

fn default_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Sizes read through serde are clamped like [`BaseParameters::set_size`].
fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let size = i32::deserialize(deserializer)?;
    Ok(if size <= 0 { DEFAULT_PAGE_SIZE } else { size })
}

impl BaseParameters {
    /// Create parameters for `page` with `size` results per page.
    ///
    /// A non-positive size is replaced with [`DEFAULT_PAGE_SIZE`]. An invalid
    /// page is kept as given and corrected by [`BaseParameters::start`].
    pub fn new(page: i32, size: i32) -> Self {
        let mut parameters = Self::default();
        parameters.set_page(page);
        parameters.set_size(size);
        parameters
    }

    /// The 1-based page, defaulting to 1.
    pub fn page(&self) -> i32 {
        self.page.unwrap_or(1)
    }

    /// The page as given, if any.
    pub fn page_option(&self) -> &Option<i32> {
        &self.page
    }

    pub fn set_page(&mut self, page: impl Into<Option<i32>>) {
        self.page = page.into();
    }

    /// Results per page; always positive.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Set the page size, replacing non-positive sizes with the default.
    pub fn set_size(&mut self, size: i32) {
        self.size = if size <= 0 { DEFAULT_PAGE_SIZE } else { size };
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn set_sort_by(&mut self, sort_by: impl Into<Option<String>>) {
        self.sort_by = sort_by.into();
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction
    }

    pub fn set_sort_direction(&mut self, sort_direction: impl Into<Option<SortDirection>>) {
        self.sort_direction = sort_direction.into();
    }

    /// Zero-based offset of the first result, `(page - 1) * size`.
    ///
    /// A negative offset resets the parameters to page 1 with the default
    /// size before recomputing.
    ///
    /// ```
    /// use search_params_repository::BaseParameters;
    ///
    /// let mut parameters = BaseParameters::new(-5, 20);
    /// assert_eq!(parameters.start(), 0);
    /// assert_eq!(parameters.page(), 1);
    /// assert_eq!(parameters.size(), 10);
    /// ```
    pub fn start(&mut self) -> i64 {
        let start = (i64::from(self.page()) - 1) * i64::from(self.size);
        if start >= 0 {
            return start;
        }

        debug!(page = self.page(), size = self.size, "Resetting invalid page");
        self.page = Some(1);
        self.size = DEFAULT_PAGE_SIZE;
        (i64::from(self.page()) - 1) * i64::from(self.size)
    }
}

/// A typed set of request parameters that can be read from and written to
/// a query string.
///
/// Implementors embed a [`BaseParameters`] and return a static descriptor
/// built with [`ParameterDescriptor::builder`]:
///
/// ```
/// use std::sync::OnceLock;
/// use search_params_repository::{BaseParameters, ParameterDescriptor, Parameters};
///
/// #[derive(Debug, Clone, Default)]
/// struct ArticleParameters {
///     base: BaseParameters,
///     tags: Vec<String>,
/// }
///
/// impl Parameters for ArticleParameters {
///     fn base(&self) -> &BaseParameters {
///         &self.base
///     }
///
///     fn base_mut(&mut self) -> &mut BaseParameters {
///         &mut self.base
///     }
///
///     fn descriptor() -> &'static ParameterDescriptor<Self> {
///         static DESCRIPTOR: OnceLock<ParameterDescriptor<ArticleParameters>> = OnceLock::new();
///         DESCRIPTOR.get_or_init(|| {
///             ParameterDescriptor::builder()
///                 .list("tags", |p: &Self| &p.tags, |p: &mut Self, tags| p.tags = tags)
///                 .build()
///         })
///     }
/// }
///
/// let parameters = ArticleParameters::from_query_string("tags=rust&tags=search&page=2").unwrap();
/// assert_eq!(parameters.tags, ["rust", "search"]);
/// assert_eq!(parameters.to_query_string(), "page=2&size=10&tags=rust&tags=search");
/// ```
pub trait Parameters: Clone + Default + Send + Sync + 'static {
    /// The paging and sorting fields.
    fn base(&self) -> &BaseParameters;

    fn base_mut(&mut self) -> &mut BaseParameters;

    /// The field table for this type.
    fn descriptor() -> &'static ParameterDescriptor<Self>;

    /// Build parameters from a flat map using the global registry.
    fn from_flat_map(map: &FlatMap) -> Result<Self, MarshalError> {
        Self::from_flat_map_with(map, ConverterRegistry::global())
    }

    /// Build parameters from a flat map using `registry`.
    fn from_flat_map_with(map: &FlatMap, registry: &ConverterRegistry) -> Result<Self, MarshalError> {
        let mut parameters = Self::default();
        Self::descriptor().populate(map, &mut parameters, registry)?;
        Ok(parameters)
    }

    /// Build parameters from a URL query string using the global registry.
    fn from_query_string(query: &str) -> Result<Self, MarshalError> {
        Self::from_flat_map(&FlatMap::from_query_string(query))
    }

    /// Write the present fields to a flat map using the global registry.
    fn to_flat_map(&self) -> FlatMap {
        self.to_flat_map_with(ConverterRegistry::global())
    }

    fn to_flat_map_with(&self, registry: &ConverterRegistry) -> FlatMap {
        Self::descriptor().to_flat_map(self, registry)
    }

    /// The canonical query string for these parameters.
    fn to_query_string(&self) -> String {
        self.to_flat_map().to_query_string()
    }
}

impl Parameters for BaseParameters {
    fn base(&self) -> &BaseParameters {
        self
    }

    fn base_mut(&mut self) -> &mut BaseParameters {
        self
    }

    fn descriptor() -> &'static ParameterDescriptor<Self> {
        static DESCRIPTOR: OnceLock<ParameterDescriptor<BaseParameters>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| ParameterDescriptor::builder().build())
    }
}

fn page<P: Parameters>(p: &P) -> &Option<i32> {
    &p.base().page
}

fn set_page<P: Parameters>(p: &mut P, page: Option<i32>) {
    p.base_mut().page = page;
}

fn size<P: Parameters>(p: &P) -> &i32 {
    &p.base().size
}

fn set_size<P: Parameters>(p: &mut P, size: i32) {
    p.base_mut().set_size(size);
}

fn sort_by<P: Parameters>(p: &P) -> &Option<String> {
    &p.base().sort_by
}

fn set_sort_by<P: Parameters>(p: &mut P, sort_by: Option<String>) {
    p.base_mut().sort_by = sort_by;
}

fn sort_direction<P: Parameters>(p: &P) -> &Option<SortDirection> {
    &p.base().sort_direction
}

fn set_sort_direction<P: Parameters>(p: &mut P, sort_direction: Option<SortDirection>) {
    p.base_mut().sort_direction = sort_direction;
}

/// Descriptors for the fields of [`BaseParameters`], as seen from `P`.
pub(crate) fn base_fields<P: Parameters>() -> Vec<FieldDescriptor<P>> {
    vec![
        FieldDescriptor::optional("page", page::<P>, set_page::<P>),
        FieldDescriptor::required("size", size::<P>, set_size::<P>),
        FieldDescriptor::optional("sort_by", sort_by::<P>, set_sort_by::<P>).with_wire_name("sortBy"),
        FieldDescriptor::optional("sort_direction", sort_direction::<P>, set_sort_direction::<P>)
            .with_wire_name("sortDirection"),
    ]
}
