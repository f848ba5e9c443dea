//! Product query service
//!
//! Resolves a [`Query`] to a [`ResultPage`]. The remote collection is tried
//! first; any failure there (unreachable, timeout, bad status, malformed body)
//! switches to the deterministic offline set, which then goes through the same
//! filter, search, sort and pagination stages. Resolution always produces a
//! page, never an error.
//!
//! ```text
//! Idle -> Fetching -> Success  -> Idle
//!                  \-> Fallback -> Idle
//! ```

use crate::config::CatalogConfig;
use crate::core::planner::{plan, search};
use crate::core::query::{PageSource, Query, ResultPage, paginate};
use crate::core::service::ProductSource;
use crate::core::sort::sort_products;
use crate::storage::{FallbackGenerator, RemoteProductSource};
use std::fmt;

/// Phase of a single resolution, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPhase {
    Idle,
    Fetching,
    Success,
    Fallback,
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionPhase::Idle => "idle",
            ResolutionPhase::Fetching => "fetching",
            ResolutionPhase::Success => "success",
            ResolutionPhase::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Façade used by every screen that lists products
///
/// Holds no mutable state; concurrent calls with different queries are
/// independent.
#[derive(Debug, Clone)]
pub struct ProductQueryService<S> {
    source: S,
    fallback: Option<FallbackGenerator>,
}

impl ProductQueryService<RemoteProductSource> {
    /// Build a service over the configured remote collection
    pub fn from_config(config: &CatalogConfig) -> Self {
        let fallback = config
            .fallback
            .enabled
            .then(|| FallbackGenerator::new(config.fallback.record_count));
        Self {
            source: RemoteProductSource::new(config.remote.clone()),
            fallback,
        }
    }
}

impl<S: ProductSource> ProductQueryService<S> {
    /// Create a service with the default offline set
    pub fn new(source: S) -> Self {
        Self {
            source,
            fallback: Some(FallbackGenerator::default()),
        }
    }

    /// Replace the offline set; `None` makes failures resolve to an empty page
    pub fn with_fallback(mut self, fallback: Option<FallbackGenerator>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve `query` to one page of products
    pub async fn resolve(&self, query: &Query) -> ResultPage {
        let (page, page_size) = (query.page(), query.page_size());
        tracing::debug!(
            phase = %ResolutionPhase::Fetching,
            page,
            page_size,
            sort = %query.sort.field,
            order = %query.sort.order,
            filters = query.filters.len(),
            "resolving product query"
        );

        let result = match self.source.fetch(query).await {
            Ok(products) => {
                tracing::debug!(
                    phase = %ResolutionPhase::Success,
                    total = products.len(),
                    "remote products received"
                );
                // The source's ordering is re-asserted before slicing
                let products = sort_products(products, &query.sort);
                paginate(products, page, page_size, PageSource::Remote)
            }
            Err(err) => {
                tracing::warn!(
                    phase = %ResolutionPhase::Fallback,
                    error = %err,
                    code = err.error_code(),
                    "remote collection unavailable, serving offline products"
                );
                self.resolve_offline(query)
            }
        };

        tracing::debug!(
            phase = %ResolutionPhase::Idle,
            items = result.items.len(),
            total = result.total,
            source = ?result.source,
            "product query resolved"
        );
        result
    }

    /// Resolve `query` against the offline set only
    pub fn resolve_offline(&self, query: &Query) -> ResultPage {
        let Some(generator) = &self.fallback else {
            return paginate(Vec::new(), query.page(), query.page_size(), PageSource::Fallback);
        };

        let products = generator.generate();
        let products = plan(&products, &query.filters);
        let products = match query.search_term() {
            Some(term) => search(products, term),
            None => products,
        };
        let products = sort_products(products, &query.sort);
        paginate(products, query.page(), query.page_size(), PageSource::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SourceError;
    use crate::core::filter::Filter;
    use crate::core::product::Product;
    use crate::core::sort::SortKey;
    use crate::storage::InMemoryProductStore;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ProductSource for Unreachable {
        async fn fetch(&self, _query: &Query) -> Result<Vec<Product>, SourceError> {
            Err(SourceError::Network {
                message: "connection refused".to_string(),
            })
        }
    }

    /// Answers in reverse id order whatever was asked
    struct IgnoresSort(Vec<Product>);

    #[async_trait]
    impl ProductSource for IgnoresSort {
        async fn fetch(&self, _query: &Query) -> Result<Vec<Product>, SourceError> {
            let mut products = self.0.clone();
            products.reverse();
            Ok(products)
        }
    }

    fn ids(page: &ResultPage) -> Vec<u32> {
        page.items.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_fallback_on_network_error() {
        let service = ProductQueryService::new(Unreachable);
        let page = service.resolve(&Query::new(1, 5)).await;
        assert_eq!(page.source, PageSource::Fallback);
        assert_eq!(page.total, 25);
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_remote_order_is_reasserted() {
        let service = ProductQueryService::new(IgnoresSort(FallbackGenerator::new(8).generate()));
        let query = Query::new(1, 3).sorted_by(SortKey::asc("price"));
        let page = service.resolve(&query).await;
        assert_eq!(page.source, PageSource::Remote);
        assert_eq!(page.total, 8);
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_in_memory_source_pages() {
        let store = InMemoryProductStore::with_products(FallbackGenerator::new(12).generate());
        let service = ProductQueryService::new(store);
        let query = Query::new(2, 4)
            .sorted_by(SortKey::desc("id"))
            .filtered_by(vec![Filter::greater_than("stock", 6)]);
        let page = service.resolve(&query).await;
        assert_eq!(page.source, PageSource::Remote);
        assert_eq!(page.total, 10);
        assert_eq!(ids(&page), vec![8, 7, 6, 5]);
    }

    #[tokio::test]
    async fn test_disabled_fallback_yields_empty_page() {
        let service = ProductQueryService::new(Unreachable).with_fallback(None);
        let page = service.resolve(&Query::default()).await;
        assert_eq!(page.source, PageSource::Fallback);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_from_config_respects_fallback_settings() {
        let mut config = CatalogConfig::default_config();
        config.fallback.record_count = 7;
        let service = ProductQueryService::from_config(&config);
        assert_eq!(service.resolve_offline(&Query::new(1, 100)).total, 7);

        config.fallback.enabled = false;
        let service = ProductQueryService::from_config(&config);
        assert_eq!(service.resolve_offline(&Query::new(1, 100)).total, 0);
    }
}
