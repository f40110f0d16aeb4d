//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., veridian-orchard.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PUBLIC_TOKEN` - Storefront API public access token
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `PUBLIC_STORE_DOMAIN` - Custom storefront domain used to recognise
//!   internal menu links (default: host of `STOREFRONT_BASE_URL`)
//! - `CATALOG_PAGE_SIZE` - Products per catalog page (default: 8)
//! - `KLAVIYO_API_KEY` / `KLAVIYO_LIST_ID` - Newsletter + contact forwarding
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`,
//!   `SENTRY_TRACES_SAMPLE_RATE` - Error tracking

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default number of products per catalog page.
pub const DEFAULT_CATALOG_PAGE_SIZE: u32 = 8;

/// Upper bound accepted by the Storefront API for `first`/`last`.
const MAX_CATALOG_PAGE_SIZE: u32 = 250;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a value as copied from a sample `.env` (case-insensitive).
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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Storefront domain without scheme (e.g., veridian-orchard.com)
    pub public_store_domain: String,
    /// Products per catalog page
    pub catalog_page_size: u32,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Klaviyo configuration (newsletter list + contact form events)
    pub klaviyo: Option<KlaviyoConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the private token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., veridian-orchard.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API public access token (safe to expose in browser)
    pub storefront_public_token: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_public_token", &self.storefront_public_token)
            .field("storefront_private_token", &"[REDACTED]")
            .finish()
    }
}

/// Klaviyo API configuration.
#[derive(Clone)]
pub struct KlaviyoConfig {
    /// Klaviyo private API key
    pub api_key: SecretString,
    /// Newsletter list ID
    pub list_id: String,
}

impl std::fmt::Debug for KlaviyoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KlaviyoConfig")
            .field("api_key", &"[REDACTED]")
            .field("list_id", &self.list_id)
            .finish()
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
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
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
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let public_store_domain = match get_optional_env("PUBLIC_STORE_DOMAIN") {
            Some(domain) => domain,
            None => host_of(&base_url)?,
        };
        let catalog_page_size = parse_page_size(get_optional_env("CATALOG_PAGE_SIZE").as_deref())?;

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let klaviyo = KlaviyoConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            public_store_domain,
            catalog_page_size,
            shopify,
            klaviyo,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_public_token: get_required_env("SHOPIFY_STOREFRONT_PUBLIC_TOKEN")?,
            storefront_private_token: get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?,
        })
    }
}

impl KlaviyoConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        match (
            get_optional_env("KLAVIYO_API_KEY"),
            get_optional_env("KLAVIYO_LIST_ID"),
        ) {
            (Some(key), Some(list_id)) => {
                validate_secret_strength(&key, "KLAVIYO_API_KEY")?;
                Ok(Some(Self {
                    api_key: SecretString::from(key),
                    list_id,
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "KLAVIYO_*".to_string(),
                "Both KLAVIYO_API_KEY and KLAVIYO_LIST_ID must be set together".to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Host component of the base URL, used as the default public store domain.
fn host_of(base_url: &str) -> Result<String, ConfigError> {
    let url = Url::parse(base_url).map_err(|e| {
        ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
    })?;
    url.host_str().map(str::to_string).ok_or_else(|| {
        ConfigError::InvalidEnvVar(
            "STOREFRONT_BASE_URL".to_string(),
            "must include a host".to_string(),
        )
    })
}

fn parse_page_size(raw: Option<&str>) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_CATALOG_PAGE_SIZE);
    };
    match raw.trim().parse::<u32>() {
        Ok(size) if (1..=MAX_CATALOG_PAGE_SIZE).contains(&size) => Ok(size),
        _ => Err(ConfigError::InvalidEnvVar(
            "CATALOG_PAGE_SIZE".to_string(),
            format!("must be between 1 and {MAX_CATALOG_PAGE_SIZE}, got {raw:?}"),
        )),
    }
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_default() += 1;
    }

    #[allow(clippy::cast_precision_loss)] // token lengths are tiny
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholders and low-entropy values for API tokens.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Shopify."
            ),
        ));
    }

    Ok(())
}

fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            public_store_domain: "localhost".to_string(),
            catalog_page_size: DEFAULT_CATALOG_PAGE_SIZE,
            shopify: ShopifyStorefrontConfig {
                store: "veridian-orchard.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                storefront_public_token: "public".to_string(),
                storefront_private_token: SecretString::from("private"),
            },
            klaviyo: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_shannon_entropy_bounds() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_validate_secret_strength_rejects_placeholders() {
        for value in ["your-storefront-token", "changeme123", "REPLACE_ME_NOW_42"] {
            let err = validate_secret_strength(value, "TOKEN").unwrap_err();
            assert!(matches!(err, ConfigError::InsecureSecret(_, _)), "{value}");
        }
    }

    #[test]
    fn test_validate_secret_strength_rejects_low_entropy() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TOKEN").is_err());
    }

    #[test]
    fn test_validate_secret_strength_accepts_real_token() {
        assert!(validate_secret_strength("shpat_9f8Kq2LmZx7Rt4Vb1Nc6Hd3Jw0Ye5Ua", "TOKEN").is_ok());
    }

    #[test]
    fn test_host_of_base_url() {
        assert_eq!(
            host_of("https://veridian-orchard.com/shop").unwrap(),
            "veridian-orchard.com"
        );
        assert!(host_of("not a url").is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size(None).unwrap(), DEFAULT_CATALOG_PAGE_SIZE);
        assert_eq!(parse_page_size(Some("12")).unwrap(), 12);
        assert!(parse_page_size(Some("0")).is_err());
        assert!(parse_page_size(Some("251")).is_err());
        assert!(parse_page_size(Some("eight")).is_err());
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let mut config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());

        config.base_url = "https://veridian-orchard.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = test_config();
        config.shopify.storefront_private_token = SecretString::from("super_private_token_value");
        config.klaviyo = Some(KlaviyoConfig {
            api_key: SecretString::from("pk_live_klaviyo_value"),
            list_id: "XyZ123".to_string(),
        });

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("veridian-orchard.myshopify.com"));
        assert!(debug_output.contains("XyZ123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_token_value"));
        assert!(!debug_output.contains("pk_live_klaviyo_value"));
    }
}
