//! Cart page and cart fragment view models.
//!
//! The same [`CartView`] backs the full `/cart` page and the fragment every
//! cart mutation swaps in, so both always render identically.

pub mod discounts;
pub mod empty;
pub mod gift_cards;
pub mod line_quantity;
pub mod summary;

pub use discounts::DiscountsView;
pub use empty::EmptyCartView;
pub use gift_cards::GiftCardsView;
pub use line_quantity::LineQuantity;
pub use summary::SummaryView;

use veridian_orchard_core::Locale;

use crate::shopify::{Cart, CartLine, SelectedOption};

use super::product_image::ImageView;

/// Variant title Shopify gives single-variant products.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// One line in the cart.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub href: String,
    pub image: Option<ImageView>,
    /// Selected options, minus Shopify's placeholder "Title: Default Title".
    pub options: Vec<SelectedOption>,
    pub quantity: LineQuantity,
    pub unit_price: String,
    pub compare_at_price: Option<String>,
    pub line_total: String,
}

impl CartLineView {
    #[must_use]
    pub fn new(line: &CartLine, locale: &Locale) -> Self {
        let merchandise = &line.merchandise;
        let product = &merchandise.product;

        Self {
            id: line.id.clone(),
            title: product.title.clone(),
            href: format!("{}/products/{}", locale.path_prefix(), product.handle),
            image: merchandise
                .image
                .as_ref()
                .map(|img| ImageView::new(img, &product.title)),
            options: merchandise
                .selected_options
                .iter()
                .filter(|o| o.value != DEFAULT_VARIANT_TITLE)
                .cloned()
                .collect(),
            quantity: LineQuantity::new(line.quantity),
            unit_price: line.cost.amount_per_quantity.display(),
            compare_at_price: line
                .cost
                .compare_at_amount_per_quantity
                .as_ref()
                .filter(|compare_at| compare_at.amount != line.cost.amount_per_quantity.amount)
                .map(|m| m.display()),
            line_total: line.cost.total_amount.display(),
        }
    }
}

/// Cart contents as rendered on the page and in mutation responses.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_quantity: i64,
    /// `None` for an empty cart.
    pub summary: Option<SummaryView>,
    pub empty: EmptyCartView,
    /// Message from the last failed mutation.
    pub error: Option<String>,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, locale: &Locale) -> Self {
        let lines: Vec<_> = cart
            .lines
            .iter()
            .map(|line| CartLineView::new(line, locale))
            .collect();

        Self {
            summary: (!lines.is_empty()).then(|| SummaryView::new(cart)),
            lines,
            total_quantity: cart.total_quantity,
            empty: EmptyCartView::new(&locale.path_prefix()),
            error: None,
        }
    }

    /// A cart with nothing in it, used before the first add.
    #[must_use]
    pub fn empty(locale: &Locale) -> Self {
        Self {
            lines: Vec::new(),
            total_quantity: 0,
            summary: None,
            empty: EmptyCartView::new(&locale.path_prefix()),
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
