//! Service traits for reading and mutating the product collection

use crate::core::error::{CatalogError, CatalogResult, SourceError};
use crate::core::product::{NewProduct, Product, ProductPatch};
use crate::core::query::Query;
use async_trait::async_trait;
use futures::future::join_all;

/// A collection the query engine can read from
///
/// Implementations return the records matching the query's filters and
/// search term, in the query's sort order. Pagination is left to the engine.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch every record matching `query`
    async fn fetch(&self, query: &Query) -> Result<Vec<Product>, SourceError>;
}

/// CRUD collaborator for products
///
/// Mutations invalidate previously resolved pages; callers re-resolve. Input
/// is validated before any I/O and failures propagate as-is.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, product: NewProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get(&self, id: u32) -> CatalogResult<Product>;

    /// Update an existing product
    async fn update(&self, id: u32, patch: ProductPatch) -> CatalogResult<Product>;

    /// Delete a product
    async fn delete(&self, id: u32) -> CatalogResult<()>;

    /// Delete several products concurrently
    ///
    /// Every deletion is attempted; the first failure (in `ids` order) is
    /// returned.
    async fn delete_many(&self, ids: &[u32]) -> CatalogResult<()> {
        let results = join_all(ids.iter().map(|id| self.delete(*id))).await;
        results
            .into_iter()
            .collect::<Result<Vec<()>, CatalogError>>()
            .map(|_| ())
    }
}
