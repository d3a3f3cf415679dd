//! Product repository.

use chrono::Utc;
use ecotrade_core::ProductId;
use ecotrade_core::catalog::{Category, NewProduct, Product, ProductUpdate};

use super::{Datastore, RepositoryError};

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    store: &'a Datastore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a Datastore) -> Self {
        Self { store }
    }

    /// All products in catalog order.
    pub async fn get_all(&self) -> Vec<Product> {
        self.store.delay().await;
        self.store.products.read().await.clone()
    }

    pub async fn get_by_id(&self, id: ProductId) -> Option<Product> {
        self.store.delay().await;
        self.store
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn get_by_category(&self, category: Category) -> Vec<Product> {
        self.store.delay().await;
        self.store
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Products flagged for the home page.
    pub async fn get_featured(&self) -> Vec<Product> {
        self.store.delay().await;
        self.store
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect()
    }

    /// Append a product with a fresh ID and the current time.
    pub async fn add(&self, product: NewProduct) -> Product {
        self.store.delay().await;
        let product = product.into_product(ProductId::generate(), Utc::now());
        self.store.products.write().await.push(product.clone());
        product
    }

    /// Merge `update` into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn update(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        self.store.delay().await;
        let mut products = self.store.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        update.apply(product);
        Ok(product.clone())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.store.delay().await;
        let mut products = self.store.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        products.remove(index);
        Ok(())
    }
}
