//! CLI command implementations.

pub mod cart;
pub mod migrate;
pub mod seed;

use gototech_core::StorageError;
use gototech_storefront::config::ConfigError;
use gototech_storefront::db::RepositoryError;

/// Errors from CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Could not connect to the database.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The cart file could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No sample product has this id.
    #[error("unknown product: {0}")]
    UnknownProduct(String),
}
