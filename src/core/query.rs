//! Queries, result pages and pagination utilities

use crate::core::filter::{Filter, FilterSet};
use crate::core::product::{Product, TaggedProduct};
use crate::core::sort::SortKey;
use serde::{Deserialize, Serialize};

/// Page size used when a query does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One request for "page N of products matching F sorted by S"
///
/// A query is plain input to a single resolution; it holds no state.
///
/// # Example
/// ```rust,ignore
/// let query = Query::new(1, 5)
///     .sorted_by(SortKey::asc("price"))
///     .filtered_by(vec![Filter::greater_than("stock", 10)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Sort key, `id asc` by default
    #[serde(default)]
    pub sort: SortKey,

    /// AND-combined filters
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Free-text term matched against several fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Query {
    fn default() -> Self {
        Self::new(default_page(), default_page_size())
    }
}

impl Query {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            sort: SortKey::default(),
            filters: Vec::new(),
            search: None,
        }
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn filtered_by(mut self, filters: impl Into<Vec<Filter>>) -> Self {
        self.filters = filters.into();
        self
    }

    pub fn with_filter_set(self, filters: FilterSet) -> Self {
        self.filtered_by(filters)
    }

    pub fn searching(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    pub fn at_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get page size, ensuring minimum of 1
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Active search term, if not blank
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Where the records of a page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    Remote,
    Fallback,
}

/// The paginated, filtered, sorted output of one query resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    /// Records of the requested page
    pub items: Vec<Product>,

    /// Number of matching records before pagination
    pub total: usize,

    /// Live data or offline substitute
    pub source: PageSource,
}

impl ResultPage {
    /// Pagination metadata for the query that produced this page
    pub fn meta(&self, query: &Query) -> PaginationMeta {
        PaginationMeta::new(query.page(), query.page_size(), self.total)
    }

    /// Items paired with their transient render tags
    pub fn tagged<'a>(&'a self, query: &'a Query) -> Vec<TaggedProduct<'a>> {
        let page = query.page();
        self.items
            .iter()
            .enumerate()
            .map(|(index, product)| TaggedProduct::new(product, page, index, &query.sort))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice one page out of a filtered and sorted collection
///
/// A page past the end yields no items but still reports the full total;
/// clamping the page number is the caller's business.
pub fn paginate(
    products: Vec<Product>,
    page: usize,
    page_size: usize,
    source: PageSource,
) -> ResultPage {
    let total = products.len();
    let page_size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);

    let items = if start >= total {
        Vec::new()
    } else {
        products.into_iter().skip(start).take(page_size).collect()
    };

    ResultPage {
        items,
        total,
        source,
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }

    /// Whether the requested page lies past the last one
    pub fn is_out_of_range(&self) -> bool {
        self.total_pages > 0 && self.page > self.total_pages
    }
}
