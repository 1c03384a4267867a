//! Database operations for the storefront `SQLite` database.
//!
//! ## Tables
//!
//! - `products` - Catalog shown on the site and looked up by add-to-cart
//! - `contacts` - Messages left through the contact form
//! - `tower_sessions` - Session storage (holds each visitor's cart)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/`. The storefront
//! applies them on startup; they can also be run via:
//! ```bash
//! cargo run -p gototech-cli -- migrate
//! ```

pub mod contacts;
pub mod products;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_sessions_sqlx_store::SqliteStore;

pub use contacts::ContactRepository;
pub use products::ProductRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool, creating the database file if needed.
///
/// In-memory databases get a single connection so every query sees the same data.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));

    let pool_options = if url.contains(":memory:") {
        // Closing the only connection would drop the database.
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(10)
    };

    pool_options.connect_with(options).await
}

/// Apply schema migrations and create the session table.
///
/// # Errors
///
/// Returns `RepositoryError` if a migration fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    SqliteStore::new(pool.clone()).migrate().await?;
    Ok(())
}
