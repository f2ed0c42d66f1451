//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SALEOR_INSTANCE_URL` - Saleor GraphQL endpoint (e.g., <https://shop.saleor.cloud/graphql/>)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SALEOR_CHANNEL` - Sales channel slug (default: default-channel)
//! - `SALEOR_REVALIDATE_SECONDS` - Catalog cache window (default: 900)
//! - `SALEOR_AUTH_TOKEN` - Bearer token for channels that are not public
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default window after which cached catalog responses are refetched.
pub const DEFAULT_REVALIDATE_SECONDS: u64 = 900;

/// Default Saleor sales channel.
pub const DEFAULT_CHANNEL: &str = "default-channel";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Saleor API configuration
    pub saleor: SaleorConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Saleor API configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct SaleorConfig {
    /// GraphQL endpoint. Also the trusted origin for webhook signatures.
    pub instance_url: Url,
    /// Sales channel slug used by catalog queries and new checkouts.
    pub channel: String,
    /// How long catalog responses stay cached before being refetched.
    pub revalidate_after: Duration,
    /// Optional bearer token sent with every GraphQL request.
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for SaleorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaleorConfig")
            .field("instance_url", &self.instance_url.as_str())
            .field("channel", &self.channel)
            .field("revalidate_after", &self.revalidate_after)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SaleorConfig {
    /// Configuration for an endpoint with every optional value defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `instance_url` is not an absolute URL.
    pub fn for_endpoint(instance_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            instance_url: parse_url("SALEOR_INSTANCE_URL", instance_url)?,
            channel: DEFAULT_CHANNEL.to_string(),
            revalidate_after: Duration::from_secs(DEFAULT_REVALIDATE_SECONDS),
            auth_token: None,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let instance_url = parse_url(
            "SALEOR_INSTANCE_URL",
            &get_required_env("SALEOR_INSTANCE_URL")?,
        )?;
        let revalidate_seconds = get_env_or_default(
            "SALEOR_REVALIDATE_SECONDS",
            &DEFAULT_REVALIDATE_SECONDS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SALEOR_REVALIDATE_SECONDS".to_string(), e.to_string())
        })?;
        let auth_token = get_optional_env("SALEOR_AUTH_TOKEN")
            .map(|token| {
                validate_secret_strength(&token, "SALEOR_AUTH_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        Ok(Self {
            instance_url,
            channel: get_env_or_default("SALEOR_CHANNEL", DEFAULT_CHANNEL),
            revalidate_after: Duration::from_secs(revalidate_seconds),
            auth_token,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the auth token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            saleor: SaleorConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an absolute URL, reporting failures against `key`.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

/// Parse a sample rate in `[0, 1]`.
fn get_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = get_env_or_default(key, default)
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Saleor generated."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-app-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_for_endpoint_defaults() {
        let config = SaleorConfig::for_endpoint("https://shop.saleor.cloud/graphql/").unwrap();
        assert_eq!(config.channel, "default-channel");
        assert_eq!(config.revalidate_after, Duration::from_secs(900));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_for_endpoint_rejects_relative_url() {
        let result = SaleorConfig::for_endpoint("/graphql/");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));

        let result = SaleorConfig::for_endpoint("mailto:ops@example.com");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            saleor: SaleorConfig::for_endpoint("https://shop.saleor.cloud/graphql/").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_saleor_config_debug_redacts_token() {
        let mut config = SaleorConfig::for_endpoint("https://shop.saleor.cloud/graphql/").unwrap();
        config.auth_token = Some(SecretString::from("super_secret_app_token"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("shop.saleor.cloud"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_app_token"));
    }
}
