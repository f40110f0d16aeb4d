//! Cache types for Storefront API responses.

use crate::shopify::types::{FooterData, HeaderData, Product, ProductConnection};

/// Cached value types. Carts are never cached.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Header(Box<HeaderData>),
    Footer(FooterData),
    Catalog(ProductConnection),
    Product(Box<Product>),
}
