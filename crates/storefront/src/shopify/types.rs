//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the wire types in
//! `storefront::queries`.

use serde::{Deserialize, Serialize};
use veridian_orchard_core::{CartLineGid, Price, ProductVariantGid};

// =============================================================================
// Money & Images
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a [`Price`], if the amount is a valid decimal.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        Price::parse(&self.amount, &self.currency_code).ok()
    }

    /// Format for display (`$24.00`), falling back to the raw amount.
    #[must_use]
    pub fn display(&self) -> String {
        self.price().map_or_else(
            || format!("{} {}", self.amount, self.currency_code),
            |price| price.display(),
        )
    }
}

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

/// Product or variant image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<String>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

impl Image {
    /// Alt text, or `fallback` when the image has none.
    #[must_use]
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alt_text
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// SEO metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Relay-style page info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A product as shown in the catalog grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
    /// First ten images; the second one is the hover image.
    pub images: Vec<Image>,
    pub price_range: PriceRange,
}

/// One page of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConnection {
    pub products: Vec<ProductItem>,
    pub page_info: PageInfo,
}

// =============================================================================
// Product detail
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Pot").
    pub name: String,
    /// Selected value (e.g., "Large", "Terracotta").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: ProductVariantGid,
    pub title: String,
    pub available_for_sale: bool,
    pub sku: Option<String>,
    pub price: Money,
    /// Original price if on sale.
    pub compare_at_price: Option<Money>,
    pub image: Option<Image>,
    pub selected_options: Vec<SelectedOption>,
}

impl ProductVariant {
    /// Whether the variant is discounted relative to its compare-at price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        match (self.price.price(), self.compare_at_price.as_ref().and_then(Money::price)) {
            (Some(price), Some(compare_at)) => compare_at.amount > price.amount,
            _ => false,
        }
    }
}

/// A product with its selected (or first available) variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    pub description: String,
    pub description_html: String,
    pub options: Vec<ProductOption>,
    pub selected_variant: Option<ProductVariant>,
    pub seo: Seo,
}

// =============================================================================
// Shop & Menus
// =============================================================================

/// Shop metadata shown in the header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// e.g. `https://veridian-orchard.com`
    pub primary_domain_url: Option<String>,
}

/// A navigation menu managed in the Shopify admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub items: Vec<MenuItem>,
}

/// A single menu entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    /// Absolute URL on the shop domain, a relative path, or an external link.
    pub url: Option<String>,
    /// `HTTP`, `PAGE`, `SHOP_POLICY`, ...
    pub item_type: Option<String>,
    pub items: Vec<MenuItem>,
}

/// Data for the site header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderData {
    pub shop: Shop,
    pub menu: Option<Menu>,
}

/// Data for the site footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterData {
    pub menu: Option<Menu>,
}

// =============================================================================
// Cart
// =============================================================================

/// Custom key/value attribute on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

/// The product a cart line's variant belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub vendor: Option<String>,
}

/// The variant bought by a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub requires_shipping: bool,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub image: Option<Image>,
    pub product: CartProduct,
    pub selected_options: Vec<SelectedOption>,
}

/// Cost breakdown for a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineCost {
    pub amount_per_quantity: Money,
    pub compare_at_amount_per_quantity: Option<Money>,
    pub total_amount: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: i64,
    pub attributes: Vec<Attribute>,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
}

/// Cart-level cost totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartCost {
    pub subtotal: Option<Money>,
    pub total: Option<Money>,
    pub total_tax: Option<Money>,
    pub total_duty: Option<Money>,
}

/// A discount code entered on the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDiscountCode {
    pub code: String,
    /// Whether the code currently applies to the cart contents.
    pub applicable: bool,
}

/// A gift card applied to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedGiftCard {
    pub id: String,
    /// Last four characters of the card code.
    pub last_characters: String,
    pub amount_used: Money,
}

/// A Shopify cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub note: Option<String>,
    pub lines: Vec<CartLine>,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub applied_gift_cards: Vec<AppliedGiftCard>,
}

/// Error returned in a cart mutation's `userErrors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Input for adding a line to the cart.
#[derive(Debug, Clone)]
pub struct CartLineInput {
    pub merchandise_id: ProductVariantGid,
    pub quantity: i64,
}

impl CartLineInput {
    #[must_use]
    pub const fn new(merchandise_id: ProductVariantGid, quantity: i64) -> Self {
        Self {
            merchandise_id,
            quantity,
        }
    }
}

/// Input for changing a cart line's quantity.
#[derive(Debug, Clone)]
pub struct CartLineUpdateInput {
    pub id: CartLineGid,
    /// Zero removes the line.
    pub quantity: i64,
}
