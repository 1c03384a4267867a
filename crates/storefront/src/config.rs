//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://gototech.db?mode=rwc`)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: `http://localhost:5000`)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: `crates/storefront/static`)
//! - `STOREFRONT_NOTIFICATION_MS` - How long cart notifications stay on screen (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://gototech.db?mode=rwc";
const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `SQLite` database URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Cart notification display time in milliseconds
    pub notification_ms: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "5000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:5000");
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));
        let notification_ms = parse_env(
            "STOREFRONT_NOTIFICATION_MS",
            &DEFAULT_NOTIFICATION_MS.to_string(),
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            notification_ms,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration for tests and local tooling: in-memory database, defaults elsewhere.
    #[must_use]
    pub fn for_database(database_url: &str) -> Self {
        Self {
            database_url: SecretString::from(database_url),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            static_dir: PathBuf::from("crates/storefront/static"),
            notification_ms: DEFAULT_NOTIFICATION_MS,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`, then the local file.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(|_| SecretString::from(DEFAULT_DATABASE_URL), SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("STOREFRONT_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let result: Result<u16, _> = parse_value("STOREFRONT_PORT", "eighty");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_parse_value_trims_whitespace() {
        let ms: u64 = parse_value("STOREFRONT_NOTIFICATION_MS", " 2500 ").unwrap();
        assert_eq!(ms, 2500);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::for_database("sqlite::memory:");

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_for_database_defaults() {
        let config = StorefrontConfig::for_database("sqlite::memory:");
        assert_eq!(config.database_url.expose_secret(), "sqlite::memory:");
        assert_eq!(config.notification_ms, 3000);
        assert!(!config.is_secure());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = StorefrontConfig::for_database("sqlite:///srv/private/gototech.db");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("/srv/private"));
    }
}
