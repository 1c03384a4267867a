//! Product lookups with an in-memory cache in front of the database.

use std::time::Duration;

use moka::future::Cache;
use sqlx::SqlitePool;

use gototech_core::{Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};

/// Cache TTL for product lookups.
const PRODUCT_TTL: Duration = Duration::from_secs(5 * 60);

/// Catalog reader used by the cart routes.
#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
    products: Cache<ProductId, Product>,
}

impl Catalog {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        let products = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(PRODUCT_TTL)
            .build();

        Self { pool, products }
    }

    /// Find a product by id. Only hits are cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database lookup fails.
    pub async fn find(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        if let Some(product) = self.products.get(id).await {
            return Ok(Some(product));
        }

        let product = ProductRepository::new(&self.pool).get(id).await?;
        if let Some(product) = &product {
            self.products.insert(id.clone(), product.clone()).await;
        }
        Ok(product)
    }

    /// Every product, uncached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).list().await
    }
}
