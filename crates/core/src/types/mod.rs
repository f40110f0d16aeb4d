//! Core types for the Veridian Orchard storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod gid;
pub mod locale;
pub mod price;

pub use email::{Email, EmailError};
pub use gid::*;
pub use locale::{Locale, LocaleError};
pub use price::{CurrencyCode, Price, PriceError};
