//! Veridian Orchard Core - Shared types library.
//!
//! Types used by the storefront binary that carry no I/O of their own:
//! money formatting, e-mail validation, Shopify global IDs and locale
//! parsing.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no database access, no
//! HTTP clients. This keeps it lightweight and unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices, emails, global IDs and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
