//! Seed the storefront catalog with the sample products.

use gototech_storefront::config::StorefrontConfig;
use gototech_storefront::db::{self, ProductRepository};

use super::CommandError;

/// Upsert the sample products into the products table.
///
/// Runs migrations first so a fresh database can be seeded in one step.
///
/// # Errors
///
/// Returns `CommandError` if configuration, connection, or a query fails.
pub async fn catalog() -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    let count = ProductRepository::new(&pool).seed().await?;
    tracing::info!(count, "Catalog seeded");
    Ok(())
}
