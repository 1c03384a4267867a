//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! gt-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://gototech.db?mode=rwc`)
//!
//! # Migration Files
//!
//! Storefront migrations: `crates/storefront/migrations/`

use gototech_storefront::config::StorefrontConfig;
use gototech_storefront::db;

use super::CommandError;

/// Run storefront database migrations.
///
/// Also creates the session table.
///
/// # Errors
///
/// Returns `CommandError` if configuration, connection, or a migration fails.
pub async fn storefront() -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running storefront migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
