//! Outbound services used by the storefront.
//!
//! # Services
//!
//! - `klaviyo` - Newsletter subscriptions and contact-form events

pub mod klaviyo;

pub use klaviyo::{CONTACT_METRIC, KlaviyoClient, KlaviyoError};
