//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ASN_STORE_PATH` - JSON file holding the cart slot (default: asn-store.json)
//! - `ASN_CATALOG_PATH` - YAML catalog definition (default: built-in sample)
//! - `ASN_ASSET_DIR` - Directory served under `/static` and `/images`
//!   (default: crates/storefront/static)
//! - `ASN_SEARCH_DEBOUNCE_MS` - Search input debounce (default: 250)
//! - `ASN_NOTICE_MS` - How long notices stay visible (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_STORE_PATH: &str = "asn-store.json";
const DEFAULT_ASSET_DIR: &str = "crates/storefront/static";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;
const DEFAULT_NOTICE_MS: u64 = 2000;

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
    /// File backing the cart key-value slot
    pub store_path: PathBuf,
    /// Optional YAML catalog replacing the built-in sample
    pub catalog_path: Option<PathBuf>,
    /// Stylesheet and product image directory
    pub asset_dir: PathBuf,
    /// Timing of deferred UI behavior
    pub timing: UiTiming,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Delays for debounced search and self-clearing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTiming {
    pub search_debounce: Duration,
    pub notice_ttl: Duration,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            notice_ttl: Duration::from_millis(DEFAULT_NOTICE_MS),
        }
    }
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            catalog_path: None,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            timing: UiTiming::default(),
            sentry: SentryConfig::default(),
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

        let host = parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or("STOREFRONT_PORT", 3000u16)?;
        let store_path = PathBuf::from(get_env_or_default("ASN_STORE_PATH", DEFAULT_STORE_PATH));
        let catalog_path = get_optional_env("ASN_CATALOG_PATH").map(PathBuf::from);
        let asset_dir = PathBuf::from(get_env_or_default("ASN_ASSET_DIR", DEFAULT_ASSET_DIR));

        let timing = UiTiming {
            search_debounce: Duration::from_millis(parse_env_or(
                "ASN_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?),
            notice_ttl: Duration::from_millis(parse_env_or("ASN_NOTICE_MS", DEFAULT_NOTICE_MS)?),
        };

        let sentry = SentryConfig {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            host,
            port,
            store_path,
            catalog_path,
            asset_dir,
            timing,
            sentry,
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a Sentry sample rate, which must lie in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_env_or(key, default)?;
    validate_sample_rate(key, rate)
}

fn validate_sample_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
