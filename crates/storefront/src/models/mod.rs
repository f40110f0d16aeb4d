//! Session-backed models for the storefront.
//!
//! Catalog and cart data live in Shopify; the only state kept locally is
//! what the visitor's session needs to find their cart again.

pub mod session;

pub use session::keys as session_keys;
