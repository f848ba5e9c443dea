//! In-memory product collection for testing and offline tooling

use crate::core::error::{CatalogResult, ProductError, SourceError};
use crate::core::planner::{plan, search};
use crate::core::product::{NewProduct, Product, ProductPatch};
use crate::core::query::Query;
use crate::core::service::{ProductRepository, ProductSource};
use crate::core::sort::{SortKey, sort_products};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use validator::Validate;

/// In-memory product store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// records are kept in id order.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<BTreeMap<u32, Product>>>,
}

impl InMemoryProductStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `products`; later duplicates of an id win
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Snapshot of every record in id order
    pub fn snapshot(&self) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().map_err(|_| poisoned("snapshot"))?;
        Ok(products.values().cloned().collect())
    }

    /// Snapshot ordered by `key`
    pub fn sorted(&self, key: &SortKey) -> CatalogResult<Vec<Product>> {
        Ok(sort_products(self.snapshot()?, key))
    }

    /// Number of stored records
    pub fn count(&self) -> CatalogResult<usize> {
        let products = self.products.read().map_err(|_| poisoned("count"))?;
        Ok(products.len())
    }
}

const POISONED: &str = "product store lock poisoned";

fn poisoned(operation: &str) -> ProductError {
    ProductError::OperationFailed {
        operation: operation.to_string(),
        message: POISONED.to_string(),
    }
}

#[async_trait]
impl ProductSource for InMemoryProductStore {
    async fn fetch(&self, query: &Query) -> Result<Vec<Product>, SourceError> {
        let products = self
            .products
            .read()
            .map_err(|_| SourceError::Unavailable {
                message: POISONED.to_string(),
            })?
            .values()
            .cloned()
            .collect::<Vec<_>>();

        let products = plan(&products, &query.filters);
        let products = match query.search_term() {
            Some(term) => search(products, term),
            None => products,
        };
        Ok(sort_products(products, &query.sort))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> CatalogResult<Product> {
        product.validate()?;

        let mut products = self.products.write().map_err(|_| poisoned("create"))?;
        let id = match product.id {
            Some(id) if products.contains_key(&id) => {
                return Err(ProductError::AlreadyExists { id }.into());
            }
            Some(id) => id,
            None => products.keys().next_back().map_or(1, |last| last + 1),
        };

        let created = product.into_product(id);
        products.insert(id, created.clone());
        tracing::debug!(id, "product created in memory");
        Ok(created)
    }

    async fn get(&self, id: u32) -> CatalogResult<Product> {
        let products = self.products.read().map_err(|_| poisoned("get"))?;
        products
            .get(&id)
            .cloned()
            .ok_or_else(|| ProductError::NotFound { id }.into())
    }

    async fn update(&self, id: u32, patch: ProductPatch) -> CatalogResult<Product> {
        patch.validate()?;

        let mut products = self.products.write().map_err(|_| poisoned("update"))?;
        let current = products.get(&id).ok_or(ProductError::NotFound { id })?;
        let updated = current.apply(&patch);
        products.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> CatalogResult<()> {
        let mut products = self.products.write().map_err(|_| poisoned("delete"))?;
        products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ProductError::NotFound { id }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Filter;

    fn store() -> InMemoryProductStore {
        InMemoryProductStore::with_products(crate::storage::FallbackGenerator::new(6).generate())
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = store();
        let created = store
            .create(NewProduct::new("Tablet", "Elektronik", 8000.0, 4))
            .await
            .unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(store.count().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_and_invalid() {
        let store = store();
        let err = store
            .create(NewProduct::new("Tablet", "Elektronik", 8000.0, 4).with_id(3))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PRODUCT_ALREADY_EXISTS");

        let err = store
            .create(NewProduct::new("", "Elektronik", 8000.0, 4))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("name"));
        assert_eq!(store.count().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = store();
        let updated = store
            .update(
                2,
                ProductPatch {
                    stock: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 0);
        assert_eq!(store.get(2).await.unwrap().stock, 0);

        store.delete(2).await.unwrap();
        assert_eq!(store.get(2).await.unwrap_err().error_code(), "PRODUCT_NOT_FOUND");
        assert!(store.delete(2).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_many_reports_missing() {
        let store = store();
        store.delete_many(&[1, 2, 3]).await.unwrap();
        assert_eq!(store.count().unwrap(), 3);

        let err = store.delete_many(&[4, 99]).await.unwrap_err();
        assert_eq!(err.error_code(), "PRODUCT_NOT_FOUND");
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_filters_and_sorts() {
        let store = store();
        let query = Query::default()
            .sorted_by(SortKey::desc("price"))
            .filtered_by(vec![Filter::greater_than("stock", 6)]);
        let ids: Vec<u32> = store.fetch(&query).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3]);
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_reported() {
        let store = store();
        let shared = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.products.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert_eq!(store.snapshot().unwrap_err().error_code(), "PRODUCT_OPERATION_FAILED");
        assert!(store.count().is_err());
        assert!(store.get(1).await.is_err());
        let err = store.fetch(&Query::default()).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn test_sorted_snapshot() {
        let sorted = store().sorted(&SortKey::desc("id")).unwrap();
        let ids: Vec<u32> = sorted.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2, 1]);
    }
}
