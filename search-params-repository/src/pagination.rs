//! Pagination metadata derived from request parameters and a hit count.
//!
//! Navigation never touches the parameters the options were built from:
//! every first/last/next/previous page is a fresh clone with only the page
//! changed.

use serde::{Serialize, Serializer};

use crate::config::DEFAULT_PAGING_RANGE;
use crate::marshal::ConverterRegistry;
use crate::parameters::Parameters;

/// One entry of a paging group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub page: i32,
    pub query_string: String,
    pub current: bool,
}

/// Serializable snapshot of a [`PaginationOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page: i32,
    pub page_size: i32,
    pub total: u64,
    pub pages: i32,
    pub from: u64,
    pub to: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Paging view over a set of parameters and the total hit count.
#[derive(Debug, Clone)]
pub struct PaginationOptions<P> {
    parameters: P,
    total: u64,
    page_size: i32,
    current_page: i32,
}

impl<P: Parameters> PaginationOptions<P> {
    /// Build options for `parameters` with `total` matching results.
    ///
    /// The parameters are cloned. A non-positive size in the clone is reset to
    /// the default and an invalid page is corrected the same way
    /// [`BaseParameters::start`](crate::BaseParameters::start) does.
    pub fn new(parameters: &P, total: u64) -> Self {
        let mut parameters = parameters.clone();
        let size = parameters.base().size();
        parameters.base_mut().set_size(size);
        parameters.base_mut().start();

        let page_size = parameters.base().size().max(1);
        let current_page = parameters.base().page();

        Self {
            parameters,
            total,
            page_size,
            current_page,
        }
    }

    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    pub fn current_page(&self) -> i32 {
        self.current_page
    }

    /// Number of pages; at least 1, even with no results.
    pub fn pages(&self) -> i32 {
        let pages = self.total.div_ceil(self.page_size as u64).max(1);
        i32::try_from(pages).unwrap_or(i32::MAX)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    fn offset(&self) -> u64 {
        (self.current_page as u64 - 1) * self.page_size as u64
    }

    /// 1-based position of the first result on this page.
    pub fn from(&self) -> u64 {
        self.offset() + 1
    }

    /// 1-based position of the last result on this page.
    pub fn to(&self) -> u64 {
        (self.offset() + self.page_size as u64).min(self.total)
    }

    fn with_page(&self, page: i32) -> P {
        let mut parameters = self.parameters.clone();
        parameters.base_mut().set_page(page);
        parameters
    }

    pub fn first_page(&self) -> P {
        self.with_page(1)
    }

    pub fn last_page(&self) -> P {
        self.with_page(self.pages())
    }

    /// Parameters for page `page`, or `None` outside `1..=pages`.
    pub fn for_page(&self, page: i32) -> Option<P> {
        (1..=self.pages())
            .contains(&page)
            .then(|| self.with_page(page))
    }

    pub fn next_page(&self) -> Option<P> {
        self.has_next_page()
            .then(|| self.with_page(self.current_page + 1))
    }

    pub fn previous_page(&self) -> Option<P> {
        self.has_previous_page()
            .then(|| self.with_page(self.current_page - 1))
    }

    /// Links for the pages within `range` of the current page, formatted
    /// with the global registry.
    pub fn paging_group(&self, range: i32) -> Vec<PageLink> {
        self.paging_group_with(range, ConverterRegistry::global())
    }

    /// [`PaginationOptions::paging_group`] with the default range of 5.
    pub fn default_paging_group(&self) -> Vec<PageLink> {
        self.paging_group(DEFAULT_PAGING_RANGE)
    }

    pub fn paging_group_with(&self, range: i32, registry: &ConverterRegistry) -> Vec<PageLink> {
        let range = range.max(0);
        let first = (self.current_page.saturating_sub(range)).max(1);
        let last = (self.current_page.saturating_add(range)).min(self.pages());

        (first..=last)
            .map(|page| PageLink {
                page,
                query_string: self.with_page(page).to_flat_map_with(registry).to_query_string(),
                current: page == self.current_page,
            })
            .collect()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            page: self.current_page,
            page_size: self.page_size,
            total: self.total,
            pages: self.pages(),
            from: self.from(),
            to: self.to(),
            has_next_page: self.has_next_page(),
            has_previous_page: self.has_previous_page(),
        }
    }
}

impl<P: Parameters> Serialize for PaginationOptions<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.summary().serialize(serializer)
    }
}
