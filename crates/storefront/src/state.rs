//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::services::{KlaviyoClient, KlaviyoError};
use crate::shopify::{ShopifyError, StorefrontClient};

/// Errors raised while building the outbound API clients.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Storefront client: {0}")]
    Storefront(#[from] ShopifyError),

    #[error("Klaviyo client: {0}")]
    Klaviyo(#[from] KlaviyoError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the outbound API clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    klaviyo: Option<KlaviyoClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either API client cannot be configured.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let klaviyo = config.klaviyo.as_ref().map(KlaviyoClient::new).transpose()?;

        Ok(Self::from_parts(config, storefront, klaviyo))
    }

    /// Assemble state from already-built clients.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        klaviyo: Option<KlaviyoClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                klaviyo,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get the Klaviyo client, if configured.
    #[must_use]
    pub fn klaviyo(&self) -> Option<&KlaviyoClient> {
        self.inner.klaviyo.as_ref()
    }
}
