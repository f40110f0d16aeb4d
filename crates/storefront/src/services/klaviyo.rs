//! Klaviyo API client.
//!
//! Subscribes footer newsletter signups to the configured list and records
//! contact-form submissions as "Submitted Contact Form" events.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::KlaviyoConfig;

/// Klaviyo API version.
const API_REVISION: &str = "2024-10-15";

/// Klaviyo API base URL.
const BASE_URL: &str = "https://a.klaviyo.com/api";

/// Upper bound on a single Klaviyo request, connect included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Metric name for contact-form events.
pub const CONTACT_METRIC: &str = "Submitted Contact Form";

/// Errors that can occur when interacting with Klaviyo API.
#[derive(Debug, Error)]
pub enum KlaviyoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Klaviyo API client.
#[derive(Clone)]
pub struct KlaviyoClient {
    client: reqwest::Client,
    base_url: String,
    list_id: String,
}

impl KlaviyoClient {
    /// Create a new Klaviyo API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &KlaviyoConfig) -> Result<Self, KlaviyoError> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client against a different API root.
    ///
    /// # Errors
    ///
    /// See [`KlaviyoClient::new`].
    pub fn with_base_url(
        config: &KlaviyoConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, KlaviyoError> {
        Self::build(config, base_url.into(), REQUEST_TIMEOUT)
    }

    fn build(
        config: &KlaviyoConfig,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, KlaviyoError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Klaviyo-API-Key {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| KlaviyoError::Config(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("revision", HeaderValue::from_static(API_REVISION));
        headers.insert(
            "Content-Type",
            HeaderValue::from_static("application/vnd.api+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            list_id: config.list_id.clone(),
        })
    }

    /// Subscribe an email to the newsletter list.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, email))]
    pub async fn subscribe_email(&self, email: &str) -> Result<(), KlaviyoError> {
        let url = format!("{}/profile-subscription-bulk-create-jobs", self.base_url);
        let body = subscription_body(email, &self.list_id);
        self.post_job(&url, &body).await
    }

    /// Record a metric event against the profile for `email`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, email, properties))]
    pub async fn track_event(
        &self,
        email: &str,
        metric: &str,
        properties: serde_json::Value,
    ) -> Result<(), KlaviyoError> {
        let url = format!("{}/events", self.base_url);
        let body = event_body(email, metric, properties);
        self.post_job(&url, &body).await
    }

    async fn post_job(&self, url: &str, body: &serde_json::Value) -> Result<(), KlaviyoError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        // 202 Accepted is the expected response for jobs and events
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Klaviyo request rejected");
            return Err(KlaviyoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

fn subscription_body(email: &str, list_id: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "type": "profile-subscription-bulk-create-job",
            "attributes": {
                "custom_source": "Veridian Orchard Footer",
                "profiles": {
                    "data": [{
                        "type": "profile",
                        "attributes": {
                            "email": email,
                            "subscriptions": {
                                "email": {"marketing": {"consent": "SUBSCRIBED"}}
                            }
                        }
                    }]
                }
            },
            "relationships": {
                "list": {"data": {"type": "list", "id": list_id}}
            }
        }
    })
}

fn event_body(email: &str, metric: &str, properties: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "type": "event",
            "attributes": {
                "properties": properties,
                "metric": {
                    "data": {"type": "metric", "attributes": {"name": metric}}
                },
                "profile": {
                    "data": {"type": "profile", "attributes": {"email": email}}
                }
            }
        }
    })
}
