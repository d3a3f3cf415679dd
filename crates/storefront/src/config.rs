//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ECOTRADE_HOST` - Bind address (default: 127.0.0.1)
//! - `ECOTRADE_PORT` - Listen port (default: 3000)
//! - `ECOTRADE_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `ECOTRADE_MOCK_LATENCY_MS` - Artificial delay on every data-layer call (default: 300)
//! - `ECOTRADE_CATALOG_SEED` - Seed for the generated catalog; random when unset
//! - `ECOTRADE_ADMIN_EMAIL` - Address that signs in as administrator (default: admin@ecotrade.com)
//! - `ECOTRADE_RATE_LIMIT` - Rate limit auth endpoints per IP (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use ecotrade_core::Email;
use thiserror::Error;

const DEFAULT_ADMIN_EMAIL: &str = "admin@ecotrade.com";

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Mock data layer settings
    pub datastore: DatastoreConfig,
    /// Normalized email that is granted the administrator role on sign-in
    pub admin_email: String,
    /// Whether `/login` and `/signup` are rate limited per client IP
    pub rate_limit_enabled: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Settings for the in-memory data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatastoreConfig {
    /// Delay applied to every call, imitating a network round trip
    pub latency: Duration,
    /// Fixed seed for catalog and leaderboard generation
    pub seed: Option<u64>,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            seed: None,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            datastore: DatastoreConfig::default(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            rate_limit_enabled: true,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
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
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("ECOTRADE_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("ECOTRADE_PORT", "3000")?;
        let base_url = get_env_or_default("ECOTRADE_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ECOTRADE_BASE_URL".to_string(), e.to_string())
        })?;

        let latency_ms: u64 = parse_env_or_default("ECOTRADE_MOCK_LATENCY_MS", "300")?;
        let seed = get_optional_env("ECOTRADE_CATALOG_SEED")
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("ECOTRADE_CATALOG_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let admin_email = Email::parse(&get_env_or_default(
            "ECOTRADE_ADMIN_EMAIL",
            DEFAULT_ADMIN_EMAIL,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("ECOTRADE_ADMIN_EMAIL".to_string(), e.to_string()))?
        .as_str()
        .to_string();

        let rate_limit_enabled = parse_env_or_default("ECOTRADE_RATE_LIMIT", "true")?;

        Ok(Self {
            host,
            port,
            base_url,
            datastore: DatastoreConfig {
                latency: Duration::from_millis(latency_ms),
                seed,
            },
            admin_email,
            rate_limit_enabled,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Whether `email` is the configured administrator address.
    #[must_use]
    pub fn is_admin_email(&self, email: &Email) -> bool {
        email.as_str() == self.admin_email
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
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.datastore.latency, Duration::from_millis(300));
        assert_eq!(config.admin_email, "admin@ecotrade.com");
        assert!(config.rate_limit_enabled);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_secure_cookies_follow_scheme() {
        let config = StorefrontConfig {
            base_url: "https://ecotrade.example".to_string(),
            ..StorefrontConfig::default()
        };
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_is_admin_email() {
        let config = StorefrontConfig::default();
        assert!(config.is_admin_email(&Email::parse("Admin@EcoTrade.com").unwrap()));
        assert!(!config.is_admin_email(&Email::parse("student@college.edu").unwrap()));
    }

    #[test]
    fn test_parse_env_or_default_uses_default() {
        let value: u16 = parse_env_or_default("ECOTRADE_TEST_UNSET_VARIABLE", "42").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_or_default_rejects_bad_default() {
        let result: Result<u16, _> = parse_env_or_default("ECOTRADE_TEST_UNSET_VARIABLE", "abc");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
