//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_DIR` - Directory of product JSON files
//!   (default: crates/storefront/content/products)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static`
//!   (default: crates/storefront/static)
//! - `STOREFRONT_SHOW_FABRIC_PANELS` - Show the derived fabric-panel count (default: false)
//! - `STOREFRONT_SHOW_HIDDEN_VARIANTS` - List variants flagged hidden (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding one JSON file per product
    pub catalog_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Debug-only parts of the product page
    pub display: DisplayOptions,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Visibility of debug-only product page elements.
///
/// Hidden data stays in the catalog; these flags only affect rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Show "Calculated fabric panels: N" once a count is derived
    pub show_fabric_panels: bool,
    /// List variants flagged `hidden`
    pub show_hidden_variants: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            catalog_dir: PathBuf::from("crates/storefront/content/products"),
            static_dir: PathBuf::from("crates/storefront/static"),
            display: DisplayOptions::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }
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

        let defaults = Self::default();

        Ok(Self {
            host: get_parsed_or("STOREFRONT_HOST", defaults.host)?,
            port: get_parsed_or("STOREFRONT_PORT", defaults.port)?,
            catalog_dir: get_optional_env("STOREFRONT_CATALOG_DIR")
                .map_or(defaults.catalog_dir, PathBuf::from),
            static_dir: get_optional_env("STOREFRONT_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            display: DisplayOptions::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: get_parsed_or(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DisplayOptions {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            show_fabric_panels: get_flag("STOREFRONT_SHOW_FABRIC_PANELS")?,
            show_hidden_variants: get_flag("STOREFRONT_SHOW_HIDDEN_VARIANTS")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Read a boolean flag; unset means false.
fn get_flag(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_flag(key, &value))
}

/// Accept the usual spellings of a boolean flag.
fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
