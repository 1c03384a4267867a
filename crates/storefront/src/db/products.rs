//! Product repository.
//!
//! Prices are stored as integer céntimos so totals never pick up float error.

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use gototech_core::catalog::ACCESSORIES;
use gototech_core::{Price, Product, ProductId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    image: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Self::new(
            row.id,
            row.name,
            row.description,
            Decimal::new(row.price_cents, 2),
            row.image,
        )
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid product price: {e}")))
    }
}

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All products in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is negative.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price_cents, image
            FROM products
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is negative.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price_cents, image
            FROM products
            WHERE id = ?
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the price overflows céntimos.
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn upsert(
        &self,
        product: &Product,
        category: &str,
        stock: i64,
        position: i64,
    ) -> Result<(), RepositoryError> {
        let price_cents = Price::soles(product.price)
            .to_cents()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO products (id, name, description, price_cents, category, image, stock, position)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                price_cents = excluded.price_cents,
                category = excluded.category,
                image = excluded.image,
                stock = excluded.stock,
                position = excluded.position
            ",
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(price_cents)
        .bind(category)
        .bind(&product.image)
        .bind(stock)
        .bind(position)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Fill an empty catalog with the sample products.
    ///
    /// Returns the number of products inserted (0 if the table already had rows).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn seed_if_empty(&self) -> Result<usize, RepositoryError> {
        if self.count().await? > 0 {
            return Ok(0);
        }
        self.seed().await
    }

    /// Write the sample products, replacing any rows with the same ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn seed(&self) -> Result<usize, RepositoryError> {
        let products = gototech_core::catalog::sample_products();
        for (position, product) in (0_i64..).zip(&products) {
            self.upsert(product, ACCESSORIES, 10, position).await?;
        }
        tracing::info!(count = products.len(), "Seeded sample products");
        Ok(products.len())
    }
}
