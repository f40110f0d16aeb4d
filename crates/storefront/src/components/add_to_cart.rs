//! Add-to-cart button.
//!
//! The button posts with HTMX and swaps itself with the response. While the
//! request is in flight the `htmx-request` class shows "Adding..." and the
//! button is disabled. A successful add returns the `Added` state, which
//! reloads the idle button after [`ADDED_RESET_DELAY`]; a failed add returns
//! the idle button with an error note.
//!
//! The form carries the page's locale so the cart is created and priced in
//! the shopper's market.

use veridian_orchard_core::{Locale, ProductVariantGid};

/// How long "Added!" stays up, as an htmx delay.
pub const ADDED_RESET_DELAY: &str = "2s";

/// Rendered button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartState {
    Idle,
    Added,
}

/// Add-to-cart button view model.
#[derive(Debug, Clone)]
pub struct AddToCartView {
    pub variant_id: String,
    pub quantity: i64,
    /// Locale of the page the button sits on, e.g. `fr-ca`.
    pub locale: String,
    /// Idle label, e.g. "Add to cart" or "Sold out".
    pub label: String,
    pub disabled: bool,
    pub state: AddToCartState,
    pub error: Option<String>,
    /// Fragment URL that restores the idle button.
    pub reset_url: String,
    pub reset_delay: &'static str,
}

impl AddToCartView {
    /// Idle button for a variant; `None` when the product has no purchasable variant.
    #[must_use]
    pub fn for_variant(
        variant_id: Option<&ProductVariantGid>,
        available_for_sale: bool,
        locale: &Locale,
    ) -> Self {
        let variant_id = variant_id.map(ProductVariantGid::as_str).unwrap_or_default();
        let disabled = variant_id.is_empty() || !available_for_sale;
        let locale = locale.to_string();

        Self {
            variant_id: variant_id.to_string(),
            quantity: 1,
            label: if disabled { "Sold out" } else { "Add to cart" }.to_string(),
            disabled,
            state: AddToCartState::Idle,
            error: None,
            reset_url: format!(
                "/cart/add-button?variant_id={}&locale={locale}",
                urlencoding::encode(variant_id)
            ),
            locale,
            reset_delay: ADDED_RESET_DELAY,
        }
    }

    /// The button after a successful add.
    #[must_use]
    pub fn added(mut self) -> Self {
        self.state = AddToCartState::Added;
        self.error = None;
        self
    }

    /// The idle button with an error note.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.state = AddToCartState::Idle;
        self.error = Some(message.into());
        self
    }

    #[must_use]
    pub fn is_added(&self) -> bool {
        self.state == AddToCartState::Added
    }
}
